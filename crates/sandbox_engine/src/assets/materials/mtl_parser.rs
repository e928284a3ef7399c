//! MTL (Material Template Library) file parser
//!
//! Parses Wavefront .mtl files into per-material Phong data. Diffuse texture
//! paths are resolved against the directory the MTL file lives in.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::foundation::math::Vec3;

/// Default diffuse component when `Kd` leaves one out
const DEFAULT_DIFFUSE: f32 = 0.8;

/// Subdirectory that remapped absolute texture paths are looked up in
const TEXTURE_DIR: &str = "textures";

/// Errors produced while loading an MTL file
#[derive(Error, Debug)]
pub enum MtlError {
    /// The file could not be read
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A record held something that is not a number
    #[error("Line {line}: {message}")]
    Parse {
        /// 1-based line number
        line: usize,
        /// What went wrong
        message: String,
    },
}

/// Parsed MTL material data (Wavefront Phong model)
#[derive(Debug, Clone, PartialEq)]
pub struct MtlData {
    /// Material name
    pub name: String,
    /// Ambient color (Ka)
    pub ambient: Vec3,
    /// Diffuse color (Kd)
    pub diffuse: Vec3,
    /// Specular color (Ks)
    pub specular: Vec3,
    /// Specular exponent (Ns)
    pub specular_exponent: f32,
    /// Dissolve/opacity (d) - 0.0 = transparent, 1.0 = opaque
    pub dissolve: f32,
    /// Resolved diffuse texture path (map_Kd)
    pub diffuse_map: Option<PathBuf>,
}

impl MtlData {
    fn named(name: String) -> Self {
        Self {
            name,
            ..Default::default()
        }
    }
}

impl Default for MtlData {
    fn default() -> Self {
        Self {
            name: String::new(),
            ambient: Vec3::zeros(),
            diffuse: Vec3::repeat(DEFAULT_DIFFUSE),
            specular: Vec3::zeros(),
            specular_exponent: 0.0,
            dissolve: 1.0,
            diffuse_map: None,
        }
    }
}

/// MTL file parser
pub struct MtlParser;

impl MtlParser {
    /// Load an MTL file; textures resolve against the file's directory
    pub fn load<P: AsRef<Path>>(path: P) -> Result<HashMap<String, MtlData>, MtlError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let base_dir = path.parent().unwrap_or_else(|| Path::new(""));

        let materials = Self::parse(&contents, base_dir)?;
        log::info!("Loaded {} material(s) from {}", materials.len(), path.display());
        Ok(materials)
    }

    /// Parse MTL file contents into a map of material name -> MtlData
    ///
    /// Records before the first `newmtl` are ignored, as are unknown records.
    pub fn parse(contents: &str, base_dir: &Path) -> Result<HashMap<String, MtlData>, MtlError> {
        let mut materials = HashMap::new();
        let mut current_material: Option<MtlData> = None;

        for (line_index, line) in contents.lines().enumerate() {
            let line_num = line_index + 1;
            let line = line.trim();

            // Skip empty lines and comments
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let mut tokens = line.split_whitespace();
            let command = match tokens.next() {
                Some(cmd) => cmd,
                None => continue,
            };

            if command == "newmtl" {
                if let Some(mat) = current_material.take() {
                    materials.insert(mat.name.clone(), mat);
                }
                let name: Vec<&str> = tokens.collect();
                current_material = Some(MtlData::named(name.join(" ")));
                continue;
            }

            let Some(mat) = current_material.as_mut() else {
                continue;
            };

            match command {
                "Ka" => mat.ambient = Self::parse_vec3(&mut tokens, line_num, "Ka", 0.0)?,
                "Kd" => mat.diffuse = Self::parse_vec3(&mut tokens, line_num, "Kd", DEFAULT_DIFFUSE)?,
                "Ks" => mat.specular = Self::parse_vec3(&mut tokens, line_num, "Ks", 0.0)?,
                "Ns" => mat.specular_exponent = Self::parse_f32(&mut tokens, line_num, "Ns", 0.0)?,
                "d" => mat.dissolve = Self::parse_f32(&mut tokens, line_num, "d", 1.0)?,
                "map_Kd" => {
                    let path: Vec<&str> = tokens.collect();
                    if path.is_empty() {
                        log::warn!("MTL line {}: map_Kd without a path", line_num);
                    } else {
                        mat.diffuse_map = Some(Self::resolve_texture_path(&path.join(" "), base_dir));
                    }
                }
                _ => {}
            }
        }

        // Save final material
        if let Some(mat) = current_material {
            materials.insert(mat.name.clone(), mat);
        }

        Ok(materials)
    }

    /// Resolve a texture path from an MTL file
    ///
    /// Absolute Windows paths (`C:/...`, `C:\...`) are exported from
    /// authoring machines and never exist here, so only their file name is
    /// kept and looked up under `<base_dir>/textures/`. Other absolute paths
    /// are kept; relative paths are joined onto `base_dir`.
    pub fn resolve_texture_path(raw: &str, base_dir: &Path) -> PathBuf {
        let bytes = raw.as_bytes();
        let is_windows_absolute = bytes.len() >= 3
            && bytes[0].is_ascii_alphabetic()
            && bytes[1] == b':'
            && (bytes[2] == b'/' || bytes[2] == b'\\');

        if is_windows_absolute {
            let file_name = raw.rsplit(|c: char| c == '/' || c == '\\').next().unwrap_or(raw);
            base_dir.join(TEXTURE_DIR).join(file_name)
        } else if raw.starts_with('/') {
            PathBuf::from(raw)
        } else {
            base_dir.join(raw)
        }
    }

    /// Parse an RGB triple; missing components take `default`
    fn parse_vec3<'a, I>(tokens: &mut I, line_num: usize, command: &str, default: f32) -> Result<Vec3, MtlError>
    where
        I: Iterator<Item = &'a str>,
    {
        let r = Self::parse_f32(tokens, line_num, command, default)?;
        let g = Self::parse_f32(tokens, line_num, command, default)?;
        let b = Self::parse_f32(tokens, line_num, command, default)?;
        Ok(Vec3::new(r, g, b))
    }

    /// Parse a single f32 value; a missing token yields `default`
    fn parse_f32<'a, I>(tokens: &mut I, line_num: usize, command: &str, default: f32) -> Result<f32, MtlError>
    where
        I: Iterator<Item = &'a str>,
    {
        match tokens.next() {
            None => Ok(default),
            Some(token) => token.parse::<f32>().map_err(|_| MtlError::Parse {
                line: line_num,
                message: format!("{} invalid float value '{}'", command, token),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> &'static Path {
        Path::new("assets/level")
    }

    #[test]
    fn test_parse_simple_material() {
        let mtl_content = r#"
# Simple material
newmtl TestMaterial
Ka 1.0 1.0 1.0
Kd 0.8 0.2 0.2
Ks 0.5 0.5 0.5
Ns 250.0
d 0.5
"#;

        let materials = MtlParser::parse(mtl_content, base()).unwrap();
        assert_eq!(materials.len(), 1);

        let mat = materials.get("TestMaterial").unwrap();
        assert_eq!(mat.name, "TestMaterial");
        assert_eq!(mat.ambient, Vec3::new(1.0, 1.0, 1.0));
        assert_eq!(mat.diffuse, Vec3::new(0.8, 0.2, 0.2));
        assert_eq!(mat.specular_exponent, 250.0);
        assert_eq!(mat.dissolve, 0.5);
        assert_eq!(mat.diffuse_map, None);
    }

    #[test]
    fn test_defaults_and_partial_colors() {
        let materials = MtlParser::parse("newmtl Bare\nKd 0.1\n", base()).unwrap();
        let mat = &materials["Bare"];
        assert_eq!(mat.diffuse, Vec3::new(0.1, 0.8, 0.8));
        assert_eq!(mat.specular, Vec3::zeros());
        assert_eq!(mat.dissolve, 1.0);
    }

    #[test]
    fn test_parse_multiple_materials() {
        let mtl_content = r#"
Kd 0.3 0.3 0.3

newmtl Material1
Kd 1.0 0.0 0.0

newmtl Stone Wall
Kd 0.0 1.0 0.0
"#;

        let materials = MtlParser::parse(mtl_content, base()).unwrap();
        assert_eq!(materials.len(), 2);

        assert_eq!(materials["Material1"].diffuse, Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(materials["Stone Wall"].diffuse, Vec3::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn test_texture_paths_resolve_against_base() {
        let mtl_content = "\
newmtl Relative
map_Kd textures/floor tiles.png
newmtl Windows
map_Kd C:/Users/artist/Desktop/brick.png
newmtl Backslash
map_Kd D:\\export\\grass.jpg
newmtl Absolute
map_Kd /srv/textures/sky.png
";

        let materials = MtlParser::parse(mtl_content, base()).unwrap();
        assert_eq!(
            materials["Relative"].diffuse_map,
            Some(PathBuf::from("assets/level/textures/floor tiles.png"))
        );
        assert_eq!(
            materials["Windows"].diffuse_map,
            Some(PathBuf::from("assets/level/textures/brick.png"))
        );
        assert_eq!(
            materials["Backslash"].diffuse_map,
            Some(PathBuf::from("assets/level/textures/grass.jpg"))
        );
        assert_eq!(materials["Absolute"].diffuse_map, Some(PathBuf::from("/srv/textures/sky.png")));
    }

    #[test]
    fn test_invalid_number_is_an_error() {
        let result = MtlParser::parse("newmtl Broken\nNs shiny\n", base());
        assert!(matches!(result, Err(MtlError::Parse { line: 2, .. })));
    }
}
