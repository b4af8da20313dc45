use super::PageKind;
use crate::core::Warning;
use crate::error::ReportError;
use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

const PNG_SIGNATURE: &[u8] = b"\x89PNG\r\n\x1a\n";

/// Full-page artwork for one page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Background {
    pub png: Vec<u8>,
    pub path: PathBuf,
}

/// Page backgrounds found in the assets directory
#[derive(Debug, Clone, Default)]
pub struct Backgrounds {
    pages: BTreeMap<PageKind, Background>,
}

impl Backgrounds {
    /// Read `cover.png`, `performance.png`, `comparison.png` and `closing.png`
    /// from `dir`. Missing files are reported as warnings; any other read
    /// failure, or a file that is not a PNG, is an error.
    pub fn load(dir: &Path, warnings: &mut Vec<Warning>) -> Result<Self, ReportError> {
        let mut pages = BTreeMap::new();
        for kind in PageKind::ALL {
            let path = dir.join(kind.background_file());
            match std::fs::read(&path) {
                Ok(png) => {
                    if !png.starts_with(PNG_SIGNATURE) {
                        return Err(ReportError::Document(format!(
                            "{} is not a PNG image",
                            path.display()
                        )));
                    }
                    log::debug!("Loaded {} background from {}", kind, path.display());
                    pages.insert(kind, Background { png, path });
                }
                Err(err) if err.kind() == ErrorKind::NotFound => {
                    log::warn!("No {} background at {}", kind, path.display());
                    warnings.push(Warning::MissingBackground {
                        page: kind.to_string(),
                        path: path.display().to_string(),
                    });
                }
                Err(err) => return Err(err.into()),
            }
        }
        Ok(Backgrounds { pages })
    }

    pub fn get(&self, kind: PageKind) -> Option<&Background> {
        self.pages.get(&kind)
    }

    #[cfg(test)]
    pub(crate) fn insert(&mut self, kind: PageKind, background: Background) {
        self.pages.insert(kind, background);
    }
}
