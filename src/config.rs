//! Command line options of the viewer.
//!
//! Options use the `--name=value` form. The first bare argument is taken as
//! the model path.

use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub model: PathBuf,
    pub vertex_shader: PathBuf,
    pub fragment_shader: PathBuf,
    pub texture: Option<PathBuf>,
    pub width: u32,
    pub height: u32,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            model: PathBuf::from("assets/Triangle.gltf"),
            vertex_shader: PathBuf::from("assets/vertex.glsl"),
            fragment_shader: PathBuf::from("assets/fragment.glsl"),
            texture: None,
            width: 500,
            height: 500,
        }
    }
}

impl Config {
    /// Parses arguments, not including the program name. Unknown or invalid
    /// arguments are logged and skipped.
    pub fn from_args<I: IntoIterator<Item = String>>(args: I) -> Config {
        let mut config = Config::default();
        let mut model_set = false;
        for arg in args {
            if let Some(path) = arg.strip_prefix("--model=") {
                config.model = PathBuf::from(path);
                model_set = true;
            } else if let Some(path) = arg.strip_prefix("--vertex-shader=") {
                config.vertex_shader = PathBuf::from(path);
            } else if let Some(path) = arg.strip_prefix("--fragment-shader=") {
                config.fragment_shader = PathBuf::from(path);
            } else if let Some(path) = arg.strip_prefix("--texture=") {
                config.texture = Some(PathBuf::from(path));
            } else if let Some(size) = arg.strip_prefix("--size=") {
                match parse_size(size) {
                    Some((width, height)) => {
                        config.width = width;
                        config.height = height;
                    }
                    None => log::warn!("Ignoring invalid window size \"{size}\""),
                }
            } else if let Some(width) = arg.strip_prefix("--width=") {
                match parse_dimension(width) {
                    Some(width) => config.width = width,
                    None => log::warn!("Ignoring invalid window width \"{width}\""),
                }
            } else if let Some(height) = arg.strip_prefix("--height=") {
                match parse_dimension(height) {
                    Some(height) => config.height = height,
                    None => log::warn!("Ignoring invalid window height \"{height}\""),
                }
            } else if !arg.starts_with("--") && !model_set {
                config.model = PathBuf::from(arg);
                model_set = true;
            } else {
                log::warn!("Ignoring unknown argument \"{arg}\"");
            }
        }
        config
    }
}

/// Parses "WxH" (or "WXH").
fn parse_size(size: &str) -> Option<(u32, u32)> {
    let (width, height) = size.split_once('x').or_else(|| size.split_once('X'))?;
    Some((parse_dimension(width)?, parse_dimension(height)?))
}

fn parse_dimension(value: &str) -> Option<u32> {
    value.parse::<u32>().ok().filter(|&v| v > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Config {
        Config::from_args(args.iter().map(|arg| arg.to_string()))
    }

    #[test]
    fn defaults_without_arguments() {
        assert_eq!(parse(&[]), Config::default());
    }

    #[test]
    fn reads_paths_and_size() {
        let config = parse(&[
            "--model=models/Box.gltf",
            "--vertex-shader=a.vert",
            "--fragment-shader=a.frag",
            "--texture=wood.png",
            "--size=1280x720",
        ]);
        assert_eq!(config.model, PathBuf::from("models/Box.gltf"));
        assert_eq!(config.vertex_shader, PathBuf::from("a.vert"));
        assert_eq!(config.fragment_shader, PathBuf::from("a.frag"));
        assert_eq!(config.texture, Some(PathBuf::from("wood.png")));
        assert_eq!((config.width, config.height), (1280, 720));
    }

    #[test]
    fn first_bare_argument_is_the_model() {
        let config = parse(&["Duck.gltf", "Other.gltf"]);
        assert_eq!(config.model, PathBuf::from("Duck.gltf"));
    }

    #[test]
    fn invalid_values_keep_defaults() {
        let config = parse(&["--size=0x10", "--width=wide", "--height=-3", "--fullscreen"]);
        assert_eq!(config, Config::default());

        let config = parse(&["--size=800X600", "--height=400"]);
        assert_eq!((config.width, config.height), (800, 400));
    }
}
