// src/infra/paths.rs — Config file discovery
//
// A project-local parsesmith.toml wins over the user-level config so a
// checked-in workspace can pin its own settings. PARSESMITH_HOME
// overrides the user config directory for isolation in tests and CI.

use directories::ProjectDirs;
use std::path::PathBuf;
use std::sync::OnceLock;

const LOCAL_CONFIG: &str = "parsesmith.toml";

static PROJECT_DIRS: OnceLock<ProjectDirs> = OnceLock::new();

fn project_dirs() -> &'static ProjectDirs {
    PROJECT_DIRS.get_or_init(|| {
        ProjectDirs::from("", "", "parsesmith").expect("Could not determine home directory")
    })
}

/// Returns the PARSESMITH_HOME override, if set.
fn parsesmith_home() -> Option<PathBuf> {
    std::env::var_os("PARSESMITH_HOME").map(PathBuf::from)
}

/// User-level configuration directory.
pub fn config_dir() -> PathBuf {
    if let Some(home) = parsesmith_home() {
        return home;
    }
    project_dirs().config_dir().to_path_buf()
}

/// User-level config file path.
pub fn config_file_path() -> PathBuf {
    config_dir().join("config.toml")
}

/// Find the config file to load: `./parsesmith.toml` first, then the
/// user-level config. `None` means run on defaults.
pub fn discover_config() -> Option<PathBuf> {
    let local = PathBuf::from(LOCAL_CONFIG);
    if local.exists() {
        return Some(local);
    }
    let user = config_file_path();
    user.exists().then_some(user)
}
