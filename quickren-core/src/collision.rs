use crate::entry::FileEntry;
use crate::error::RenameError;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Upper bound on `_N` suffixes tried for a single name
pub const MAX_DISAMBIGUATION_ATTEMPTS: usize = 10_000;

/// A proposed name after collision resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    pub entry: FileEntry,
    pub final_name: String,
    /// True when a `_N` suffix had to be added
    pub was_adjusted: bool,
}

impl Resolved {
    pub fn destination(&self) -> PathBuf {
        self.entry.parent().join(&self.final_name)
    }
}

/// Assigns unique destination names across a whole batch.
///
/// Claims are keyed by full destination path so a selection spanning several
/// directories only collides within each directory.
#[derive(Debug, Clone, Default)]
pub struct CollisionResolver {
    claimed: HashSet<String>,
    case_insensitive: bool,
}

impl CollisionResolver {
    /// `existing_untouched` holds paths already on disk that are not part of
    /// the selection; those names can never be handed out.
    pub fn new(existing_untouched: impl IntoIterator<Item = PathBuf>, case_insensitive: bool) -> Self {
        let mut resolver = Self {
            claimed: HashSet::new(),
            case_insensitive,
        };
        for path in existing_untouched {
            let key = resolver.key(&path);
            resolver.claimed.insert(key);
        }
        resolver
    }

    fn key(&self, path: &Path) -> String {
        let s = path.to_string_lossy();
        if self.case_insensitive {
            s.to_lowercase()
        } else {
            s.into_owned()
        }
    }

    pub fn is_claimed(&self, path: &Path) -> bool {
        self.claimed.contains(&self.key(path))
    }

    /// Resolve every proposed name in selection order.
    ///
    /// The first entry to propose a name keeps it; later ones get `_1`, `_2`, ...
    /// inserted before the extension until a free name turns up.
    pub fn resolve(
        &mut self,
        proposed: Vec<(FileEntry, String)>,
    ) -> Result<Vec<Resolved>, RenameError> {
        let mut resolved = Vec::with_capacity(proposed.len());

        for (entry, name) in proposed {
            let parent = entry.parent().to_path_buf();
            let key = self.key(&parent.join(&name));

            if self.claimed.insert(key) {
                resolved.push(Resolved {
                    entry,
                    final_name: name,
                    was_adjusted: false,
                });
                continue;
            }

            let mut final_name = None;
            for attempt in 1..=MAX_DISAMBIGUATION_ATTEMPTS {
                let candidate = disambiguate(&name, attempt);
                let key = self.key(&parent.join(&candidate));
                if self.claimed.insert(key) {
                    final_name = Some(candidate);
                    break;
                }
            }

            let Some(final_name) = final_name else {
                return Err(RenameError::CollisionUnresolvable {
                    name,
                    attempts: MAX_DISAMBIGUATION_ATTEMPTS,
                });
            };

            tracing::debug!(original = %name, adjusted = %final_name, "resolved name collision");
            resolved.push(Resolved {
                entry,
                final_name,
                was_adjusted: true,
            });
        }

        Ok(resolved)
    }
}

/// Insert `_{n}` before the extension: `dup.jpg` -> `dup_1.jpg`
pub fn disambiguate(name: &str, n: usize) -> String {
    let path = Path::new(name);
    match (path.file_stem(), path.extension()) {
        (Some(stem), Some(ext)) => format!(
            "{}_{}.{}",
            stem.to_string_lossy(),
            n,
            ext.to_string_lossy()
        ),
        _ => format!("{}_{}", name, n),
    }
}
