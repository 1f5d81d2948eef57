//! Command-line launch options.

use std::path::PathBuf;

use super::settings::Settings;
use crate::camera::CameraMode;
use crate::render::PlaneVariant;

/// Verbosity selected on the command line.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Verbosity {
    Quiet,
    #[default]
    Info,
    Debug,
    Trace,
}

impl Verbosity {
    /// Default `tracing` filter when `RUST_LOG` is unset.
    pub fn filter(self) -> &'static str {
        match self {
            Verbosity::Quiet => "warn",
            Verbosity::Info => "info",
            Verbosity::Debug => "debug",
            Verbosity::Trace => "trace",
        }
    }
}

/// Overrides applied on top of the persisted settings for one run.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LaunchOptions {
    pub camera: Option<CameraMode>,
    pub variant: Option<PlaneVariant>,
    pub shader_root: Option<PathBuf>,
    pub asset_root: Option<PathBuf>,
    /// `(min, max, step)`
    pub grid: Option<(f32, f32, f32)>,
    pub verbosity: Verbosity,
}

/// What the command line asks for.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    Run(LaunchOptions),
    Help,
    Version,
}

impl LaunchOptions {
    /// Parse arguments (without the program name).
    pub fn parse<I, S>(args: I) -> Result<Command, String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut opts = LaunchOptions::default();
        let mut it = args.into_iter();

        while let Some(arg) = it.next() {
            let arg = arg.as_ref();
            let mut value = |flag: &str| {
                it.next()
                    .map(|v| v.as_ref().to_string())
                    .ok_or_else(|| format!("{} expects a value", flag))
            };
            match arg {
                "-h" | "--help" => return Ok(Command::Help),
                "-V" | "--version" => return Ok(Command::Version),
                "-v" | "--verbose" => opts.verbosity = Verbosity::Debug,
                "-vv" | "--trace" => opts.verbosity = Verbosity::Trace,
                "-q" | "--quiet" => opts.verbosity = Verbosity::Quiet,
                "--plain" => opts.variant = Some(PlaneVariant::Plain),
                "--water" => opts.variant = Some(PlaneVariant::Water),
                "-c" | "--camera" => opts.camera = Some(value(arg)?.parse()?),
                "--shaders" => opts.shader_root = Some(PathBuf::from(value(arg)?)),
                "--assets" => opts.asset_root = Some(PathBuf::from(value(arg)?)),
                "--grid" => opts.grid = Some(parse_grid(&value(arg)?)?),
                other => return Err(format!("unknown argument '{}'", other)),
            }
        }

        Ok(Command::Run(opts))
    }

    /// Apply the overrides to `settings`.
    pub fn apply(&self, settings: &mut Settings) {
        if let Some(camera) = self.camera {
            settings.camera_mode = camera;
        }
        if let Some(variant) = self.variant {
            settings.variant = variant;
        }
        if let Some(dir) = &self.shader_root {
            settings.shader_root = Some(dir.clone());
        }
        if let Some(dir) = &self.asset_root {
            settings.asset_root = Some(dir.clone());
        }
        if let Some((min, max, step)) = self.grid {
            settings.grid_min = min;
            settings.grid_max = max;
            settings.grid_step = step;
        }
    }
}

fn parse_grid(s: &str) -> Result<(f32, f32, f32), String> {
    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    if parts.len() != 3 {
        return Err(format!("--grid expects min,max,step, got '{}'", s));
    }
    let num = |p: &str| p.parse::<f32>().map_err(|e| format!("bad grid value '{}': {}", p, e));
    let (min, max, step) = (num(parts[0])?, num(parts[1])?, num(parts[2])?);
    crate::mesh::grid_columns(min, max, step).map_err(|e| e.to_string())?;
    Ok((min, max, step))
}

pub const USAGE: &str = "\
Usage: water-plane [OPTIONS]

Options:
  -c, --camera <MODE>     third | first | globe
      --plain             Flat tessellated grid
      --water             Displaced, textured water surface
      --shaders <DIR>     Shader root containing plain/ and water/
      --assets <DIR>      Directory with displacement-map.bmp and water.bmp
      --grid <MIN,MAX,STEP>
                          Grid extent and spacing
  -v, --verbose           Debug logging (-vv for trace)
  -q, --quiet             Warnings and errors only
  -V, --version           Print version
  -h, --help              Print this help

Controls:
  Arrow keys              Move / turn / zoom depending on camera
  Left mouse drag         Rotate (globe camera)
  1, 2, 3                 Third-person, first-person, globe camera
  Tab                     Toggle side panel";

#[cfg(test)]
mod tests {
    use super::*;

    fn run(args: &[&str]) -> LaunchOptions {
        match LaunchOptions::parse(args.iter().copied()).unwrap() {
            Command::Run(opts) => opts,
            other => panic!("expected run, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_args() {
        assert_eq!(run(&[]), LaunchOptions::default());
    }

    #[test]
    fn test_full_args() {
        let opts = run(&["--camera", "first", "--plain", "--grid", "-2, 2, 0.5", "-vv", "--shaders", "/tmp/s"]);
        assert_eq!(opts.camera, Some(CameraMode::FirstPerson));
        assert_eq!(opts.variant, Some(PlaneVariant::Plain));
        assert_eq!(opts.grid, Some((-2.0, 2.0, 0.5)));
        assert_eq!(opts.verbosity, Verbosity::Trace);
        assert_eq!(opts.shader_root, Some(PathBuf::from("/tmp/s")));
    }

    #[test]
    fn test_help_and_version() {
        assert_eq!(LaunchOptions::parse(["--plain", "-h"]).unwrap(), Command::Help);
        assert_eq!(LaunchOptions::parse(["--version"]).unwrap(), Command::Version);
    }

    #[test]
    fn test_errors() {
        assert!(LaunchOptions::parse(["--camera"]).is_err());
        assert!(LaunchOptions::parse(["--camera", "drone"]).is_err());
        assert!(LaunchOptions::parse(["--grid", "1,2"]).is_err());
        assert!(LaunchOptions::parse(["--grid", "2,1,0.5"]).is_err());
        assert!(LaunchOptions::parse(["--bogus"]).is_err());
    }

    #[test]
    fn test_apply() {
        let mut settings = Settings::default();
        let opts = run(&["--camera", "third", "--grid", "0,4,1"]);
        opts.apply(&mut settings);
        assert_eq!(settings.camera_mode, CameraMode::ThirdPerson);
        assert_eq!((settings.grid_min, settings.grid_max, settings.grid_step), (0.0, 4.0, 1.0));
        assert_eq!(settings.variant, Settings::default().variant);
    }
}
