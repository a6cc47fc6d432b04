use std::{
    collections::HashMap,
    env,
    fs,
    io::{BufRead, BufReader},
    path::PathBuf,
    time::Duration,
};

use directories::BaseDirs;

#[derive(Debug, Clone)]
pub struct Config {
    inner: HashMap<String, String>,
    pub config_path: PathBuf,
}

impl Config {
    pub fn load() -> Self {
        Self::load_from(default_config_path())
    }

    /// Defaults, then the rc file at `config_path`, then the environment.
    pub fn load_from(config_path: PathBuf) -> Self {
        let mut map = default_map();

        if config_path.exists() {
            if let Ok(file) = fs::File::open(&config_path) {
                let reader = BufReader::new(file);
                for line in reader.lines().map_while(Result::ok) {
                    if let Some((k, v)) = parse_rc_line(&line) {
                        map.insert(k, v);
                    }
                }
            }
        }

        // Overlay environment variables (take precedence)
        for (k, v) in env::vars() {
            if is_config_key(&k) {
                map.insert(k, v);
            }
        }

        Self { inner: map, config_path }
    }

    pub fn get(&self, key: &str) -> Option<String> {
        // ENV first
        if let Ok(v) = env::var(key) {
            return Some(v);
        }
        self.inner.get(key).cloned()
    }

    pub fn get_bool(&self, key: &str) -> bool {
        self.get(key)
            .map(|v| v.eq_ignore_ascii_case("true"))
            .unwrap_or(false)
    }

    pub fn get_u64(&self, key: &str) -> Option<u64> {
        self.get(key).and_then(|v| v.trim().parse::<u64>().ok())
    }

    pub fn python_bin(&self) -> String {
        self.get("PYTHON_BIN").unwrap_or_else(|| "python3.10".into())
    }

    pub fn execution_timeout(&self) -> Duration {
        Duration::from_secs(self.get_u64("EXECUTION_TIMEOUT").unwrap_or(10))
    }

    /// `None` means the container run is not bounded.
    pub fn container_timeout(&self) -> Option<Duration> {
        match self.get_u64("CONTAINER_TIMEOUT") {
            Some(0) | None => None,
            Some(secs) => Some(Duration::from_secs(secs)),
        }
    }

    pub fn container_runtime(&self) -> String {
        self.get("CONTAINER_RUNTIME").unwrap_or_else(|| "docker".into())
    }

    pub fn docker_image(&self) -> String {
        self.get("DOCKER_IMAGE")
            .unwrap_or_else(|| "code-interpreter-demo:latest".into())
    }

    pub fn container_workdir(&self) -> String {
        self.get("CONTAINER_WORKDIR").unwrap_or_else(|| "/app".into())
    }

    pub fn script_dir(&self) -> PathBuf {
        self.get("SCRIPT_DIR")
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(env::temp_dir)
    }
}

fn parse_rc_line(line: &str) -> Option<(String, String)> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }
    let (k, v) = line.split_once('=')?;
    Some((k.trim().to_string(), v.trim().to_string()))
}

fn is_config_key(k: &str) -> bool {
    // Accept known keys or CI_*/OPENAI_* for forward-compat
    const KEYS: &[&str] = &[
        "OPENAI_API_KEY",
        "API_BASE_URL",
        "REQUEST_TIMEOUT",
        "DEFAULT_MODEL",
        "PRETTIFY_MARKDOWN",
        "DEFAULT_EXECUTION_ENV",
        "PYTHON_BIN",
        "EXECUTION_TIMEOUT",
        "CONTAINER_RUNTIME",
        "DOCKER_IMAGE",
        "CONTAINER_WORKDIR",
        "CONTAINER_TIMEOUT",
        "SCRIPT_DIR",
    ];

    KEYS.contains(&k) || k.starts_with("CI_") || k.starts_with("OPENAI_")
}

fn config_dir() -> PathBuf {
    let base = BaseDirs::new()
        .map(|b| b.config_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("~/.config"));
    base.join("code_interpreter")
}

fn default_config_path() -> PathBuf {
    config_dir().join(".circ")
}

fn default_map() -> HashMap<String, String> {
    let mut m = HashMap::new();

    // Numbers
    m.insert("REQUEST_TIMEOUT".into(), "60".into());
    m.insert("EXECUTION_TIMEOUT".into(), "10".into());
    m.insert("CONTAINER_TIMEOUT".into(), "0".into());

    // Strings
    m.insert("DEFAULT_MODEL".into(), "gpt-4o".into());
    m.insert("API_BASE_URL".into(), "default".into());
    m.insert("DEFAULT_EXECUTION_ENV".into(), "none".into());
    m.insert("PYTHON_BIN".into(), "python3.10".into());
    m.insert("CONTAINER_RUNTIME".into(), "docker".into());
    m.insert("DOCKER_IMAGE".into(), "code-interpreter-demo:latest".into());
    m.insert("CONTAINER_WORKDIR".into(), "/app".into());
    m.insert(
        "SCRIPT_DIR".into(),
        env::temp_dir().to_string_lossy().into_owned(),
    );

    // Bools as strings
    m.insert("PRETTIFY_MARKDOWN".into(), "false".into());

    m
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn rc_lines_skip_comments_and_blanks() {
        assert_eq!(parse_rc_line("   "), None);
        assert_eq!(parse_rc_line("# DOCKER_IMAGE=foo"), None);
        assert_eq!(parse_rc_line("no equals sign"), None);
        assert_eq!(
            parse_rc_line(" DOCKER_IMAGE = my-image:1 "),
            Some(("DOCKER_IMAGE".into(), "my-image:1".into()))
        );
    }

    #[test]
    fn rc_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".circ");
        let mut f = fs::File::create(&path).unwrap();
        writeln!(f, "# local overrides").unwrap();
        writeln!(f, "CI_TEST_ONLY_KEY=from-rc").unwrap();
        writeln!(f, "CI_TEST_ONLY_TIMEOUT=3").unwrap();

        let cfg = Config::load_from(path);
        assert_eq!(cfg.get("CI_TEST_ONLY_KEY").as_deref(), Some("from-rc"));
        assert_eq!(cfg.get_u64("CI_TEST_ONLY_TIMEOUT"), Some(3));
        assert!(cfg.get("REQUEST_TIMEOUT").is_some());
    }

    #[test]
    fn container_timeout_zero_means_unbounded() {
        if env::var("CONTAINER_TIMEOUT").is_ok() {
            return;
        }
        let cfg = Config::load_from(PathBuf::from("/nonexistent/.circ"));
        assert_eq!(cfg.container_timeout(), None);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".circ");
        fs::write(&path, "CONTAINER_TIMEOUT=30\n").unwrap();
        let cfg = Config::load_from(path);
        assert_eq!(cfg.container_timeout(), Some(Duration::from_secs(30)));
    }

    #[test]
    fn known_keys_and_prefixes_are_accepted() {
        assert!(is_config_key("DOCKER_IMAGE"));
        assert!(is_config_key("CI_ANYTHING"));
        assert!(is_config_key("OPENAI_API_KEY"));
        assert!(!is_config_key("HOME"));
    }
}
