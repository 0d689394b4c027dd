mod editor_mode;

use overrides::OverridesConfig;

fn main() {
    let config = config_from_args(std::env::args().skip(1));
    editor_mode::run_editor_mode(config);
}

/// `--file <path>` takes precedence over `BUILDING_OVERRIDES_FILE`.
fn config_from_args(mut args: impl Iterator<Item = String>) -> OverridesConfig {
    while let Some(arg) = args.next() {
        if arg == "--file" {
            if let Some(path) = args.next() {
                return OverridesConfig::with_file(path);
            }
        } else if let Some(path) = arg.strip_prefix("--file=") {
            return OverridesConfig::with_file(path);
        }
    }
    OverridesConfig::from_env()
}
