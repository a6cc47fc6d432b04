//! System role text for code generation, one flavour per execution mode.

use crate::execution::ExecutionMode;

const RULES: &str = "You are an intelligent AI agent designed to generate accurate python code.
Here are your STRICT instructions:
- If the question does not require writing code, provide a clear and concise answer without generating any code.
- Whatever question is asked to you generate just the python code based on that and it's important that you just generate the code, no explanation of the code before or after.
- Think step by step how to solve the problem before you write the code.
- If the code involves doing system level tasks, it should have the code to identify the platform, the $HOME directory to make sure the code execution is successful.
- Code should be inside of the ```python ``` block.
- Make sure all the imports are always there to perform the task.
- At the end of the generated code, always include a line to run the generated function.
- The code should print output in a human-readable and understandable format.";

/// Where charts go differs: the host run prints a full path under /tmp, the
/// container run saves into its mounted work dir and prints the bare name.
pub fn system_prompt(mode: ExecutionMode, container_workdir: &str) -> String {
    let image_rule = match mode {
        ExecutionMode::Docker => format!(
            "- If you are generating charts, graphs or anything visual, convert them to image and save it to the {} location and return as well as print just the name of the image file without path.",
            container_workdir.trim_end_matches('/')
        ),
        ExecutionMode::Local | ExecutionMode::None => "- If you are generating charts, graphs or anything visual, convert them to image and save it to the /tmp location and return as well as print just the name of the image file path.".to_string(),
    };
    format!("{}\n{}", RULES, image_rule)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn docker_prompt_targets_workdir_and_bare_name() {
        let text = system_prompt(ExecutionMode::Docker, "/app/");
        assert!(text.contains("save it to the /app location"));
        assert!(text.contains("without path"));
        assert!(!text.contains("/tmp"));
    }

    #[test]
    fn local_and_none_share_the_tmp_prompt() {
        let local = system_prompt(ExecutionMode::Local, "/app");
        assert!(local.contains("save it to the /tmp location"));
        assert_eq!(local, system_prompt(ExecutionMode::None, "/app"));
    }

    #[test]
    fn rules_ask_for_a_python_fence() {
        assert!(system_prompt(ExecutionMode::Local, "/app").contains("```python ``` block"));
    }
}
