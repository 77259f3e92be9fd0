//! CLI command implementations

pub mod clear;
pub mod crop;
pub mod info;

use anyhow::{Context, Result};
use picbuf_core::{PictureFormat, PictureManager};
use picbuf_mem::{FormatSpec, MemConfig, MemManager, MemPicture};
use picbuf_ops::{read_packed, write_packed};
use std::path::Path;
use tracing::debug;

use crate::PictureArgs;

/// Builds the manager described by the command line.
///
/// `--format` overrides the config's format; margins and alignment only
/// come from the config.
pub fn manager(args: &PictureArgs) -> Result<MemManager> {
    let mut config = match &args.config {
        Some(path) => MemConfig::from_file(path)
            .with_context(|| format!("Failed to load config: {}", path.display()))?,
        None => MemConfig::new(PictureFormat::yuv420p()),
    };
    if let Some(name) = &args.format {
        config.format = FormatSpec::Preset(name.clone());
    }
    MemManager::with_config(&config).context("Invalid picture format")
}

/// Allocates a picture and fills it from a raw file.
pub fn load_picture(path: &Path, manager: &MemManager, args: &PictureArgs) -> Result<MemPicture> {
    let data =
        std::fs::read(path).with_context(|| format!("Failed to load: {}", path.display()))?;
    let mut picture = manager
        .alloc(args.hsize, args.vsize)
        .with_context(|| format!("Failed to allocate {}x{}", args.hsize, args.vsize))?;
    read_packed(&mut picture, &data)
        .with_context(|| format!("Failed to read: {}", path.display()))?;
    debug!(path = %path.display(), bytes = data.len(), "loaded picture");
    Ok(picture)
}

/// Writes a picture as a raw file.
pub fn save_picture(path: &Path, picture: &MemPicture) -> Result<()> {
    let data = write_packed(picture)?;
    std::fs::write(path, &data).with_context(|| format!("Failed to save: {}", path.display()))?;
    debug!(path = %path.display(), bytes = data.len(), "saved picture");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ClearArgs, CropArgs};
    use std::path::PathBuf;
    use tempfile::{tempdir, TempDir};

    fn picture_args(hsize: usize, vsize: usize, format: &str) -> PictureArgs {
        PictureArgs {
            hsize,
            vsize,
            format: Some(format.into()),
            config: None,
        }
    }

    fn write_input(dir: &TempDir, data: &[u8]) -> PathBuf {
        let path = dir.path().join("in.yuv");
        std::fs::write(&path, data).unwrap();
        path
    }

    fn crop_args(input: PathBuf, output: PathBuf, picture: PictureArgs) -> CropArgs {
        CropArgs {
            input,
            output,
            picture,
            hskip: 0,
            vskip: 0,
            width: -1,
            height: -1,
        }
    }

    fn padded_gray() -> Vec<u8> {
        (0..4u8)
            .flat_map(|y| [0, 4 * y, 4 * y + 1, 4 * y + 2, 4 * y + 3])
            .collect()
    }

    #[test]
    fn test_crop_file() {
        let dir = tempdir().unwrap();
        let input = write_input(&dir, &(0..16).collect::<Vec<u8>>());
        let output = dir.path().join("out.yuv");

        let args = CropArgs {
            hskip: 1,
            vskip: 1,
            width: 2,
            height: 2,
            ..crop_args(input, output.clone(), picture_args(4, 4, "gray8"))
        };
        crop::run(args, false).unwrap();
        assert_eq!(std::fs::read(&output).unwrap(), vec![5, 6, 9, 10]);
    }

    #[test]
    fn test_pad_file_by_copy() {
        let dir = tempdir().unwrap();
        let input = write_input(&dir, &(0..16).collect::<Vec<u8>>());
        let output = dir.path().join("out.yuv");

        let args = CropArgs {
            hskip: -1,
            width: 5,
            ..crop_args(input, output.clone(), picture_args(4, 4, "gray8"))
        };
        crop::run(args, false).unwrap();
        assert_eq!(std::fs::read(&output).unwrap(), padded_gray());
    }

    #[test]
    fn test_pad_file_in_margins() {
        let dir = tempdir().unwrap();
        let input = write_input(&dir, &(0..16).collect::<Vec<u8>>());
        let output = dir.path().join("out.yuv");
        let config = dir.path().join("margins.yaml");
        std::fs::write(&config, "format: gray8\nhprepend: 4\n").unwrap();

        let picture = PictureArgs {
            format: None,
            config: Some(config),
            ..picture_args(4, 4, "gray8")
        };
        let manager = manager(&picture).unwrap();
        assert_eq!(manager.format(), &PictureFormat::gray8());
        assert_eq!(manager.margins().0, 4);

        let args = CropArgs {
            hskip: -1,
            width: 5,
            ..crop_args(input, output.clone(), picture)
        };
        crop::run(args, false).unwrap();
        assert_eq!(std::fs::read(&output).unwrap(), padded_gray());
    }

    #[test]
    fn test_clear_file() {
        let dir = tempdir().unwrap();
        let input = write_input(&dir, &[0x10; 6]);
        let output = dir.path().join("out.yuv");

        let args = ClearArgs {
            input: input.clone(),
            output: output.clone(),
            picture: picture_args(2, 2, "yuv420p"),
            plane: None,
            x: 0,
            y: 0,
            w: -1,
            h: -1,
        };
        clear::run(args, false).unwrap();
        assert_eq!(std::fs::read(&output).unwrap(), vec![0, 0, 0, 0, 0x80, 0x80]);

        let args = ClearArgs {
            input,
            output: output.clone(),
            picture: picture_args(2, 2, "yuv420p"),
            plane: Some("u8".into()),
            x: 0,
            y: 0,
            w: -1,
            h: -1,
        };
        clear::run(args, false).unwrap();
        assert_eq!(
            std::fs::read(&output).unwrap(),
            vec![0x10, 0x10, 0x10, 0x10, 0x80, 0x10]
        );
    }

    #[test]
    fn test_wrong_input_size() {
        let dir = tempdir().unwrap();
        let input = write_input(&dir, &[0; 5]);
        let args = crop_args(input, dir.path().join("out.yuv"), picture_args(2, 2, "yuv420p"));
        assert!(crop::run(args, false).is_err());
    }

    #[test]
    fn test_unknown_format() {
        assert!(manager(&picture_args(2, 2, "yuv411p")).is_err());
    }
}
