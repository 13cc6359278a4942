//! Class identity resolution
//!
//! Maps a class file to its class identity. The classes directory is the
//! conventional top-level bucket and is not part of the identity:
//!
//! ```text
//! classes dir  /app/META-INF/classes
//! class file   /app/META-INF/classes/Service/PaymentBean.php
//! identity     Service\PaymentBean
//! ```
//!
//! The classes directory is stripped from the file path as a whole, so
//! relative roots such as `.` behave like absolute ones. The separators of
//! what remains become namespace separators and the extension is removed.

use crate::error::IdentityResolutionError;
use std::path::{Component, Path, PathBuf};
use trellis_types::{ClassIdentity, IdentityError};

/// Resolves class files below one classes directory
#[derive(Debug, Clone)]
pub struct IdentityResolver {
    classes_dir: PathBuf,
}

impl IdentityResolver {
    pub fn new(classes_dir: impl Into<PathBuf>) -> Self {
        Self {
            classes_dir: classes_dir.into(),
        }
    }

    pub fn classes_dir(&self) -> &Path {
        &self.classes_dir
    }

    /// Resolve the class identity of a file below the classes directory
    pub fn resolve(&self, file: &Path) -> Result<ClassIdentity, IdentityResolutionError> {
        let relative = file.strip_prefix(&self.classes_dir).map_err(|_| {
            IdentityResolutionError::OutsideRoot {
                path: file.to_path_buf(),
                root: self.classes_dir.clone(),
            }
        })?;

        let mut segments = Vec::new();
        for component in relative.components() {
            if let Component::Normal(segment) = component {
                let segment = segment
                    .to_str()
                    .ok_or_else(|| IdentityResolutionError::NonUtf8 {
                        path: file.to_path_buf(),
                    })?;
                segments.push(segment);
            }
        }

        if let Some(last) = segments.pop() {
            let stem = match last.rsplit_once('.') {
                Some((stem, _extension)) => stem,
                None => last,
            };
            segments.push(stem);
        }

        if segments.iter().all(|s| s.is_empty()) {
            return Err(IdentityResolutionError::Empty {
                path: file.to_path_buf(),
            });
        }

        ClassIdentity::from_segments(segments).map_err(|source| match source {
            IdentityError::Empty => IdentityResolutionError::Empty {
                path: file.to_path_buf(),
            },
            source => IdentityResolutionError::Invalid {
                path: file.to_path_buf(),
                source,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolves_namespaced_class() {
        let resolver = IdentityResolver::new("/app/classes");
        let id = resolver
            .resolve(Path::new("/app/classes/Service/PaymentBean.ext"))
            .unwrap();
        assert_eq!(id.as_str(), "Service\\PaymentBean");
    }

    #[test]
    fn test_resolves_deeply_nested_class() {
        let resolver = IdentityResolver::new("/srv/webapp/META-INF/classes");
        let id = resolver
            .resolve(Path::new(
                "/srv/webapp/META-INF/classes/Acme/Billing/Service/InvoiceBean.php",
            ))
            .unwrap();
        assert_eq!(id.as_str(), "Acme\\Billing\\Service\\InvoiceBean");
        assert_eq!(id.short_name(), "InvoiceBean");
    }

    #[test]
    fn test_class_without_namespace() {
        let resolver = IdentityResolver::new("/app/classes");
        let id = resolver.resolve(Path::new("/app/classes/Bean.ext")).unwrap();
        assert_eq!(id.as_str(), "Bean");
    }

    #[test]
    fn test_bucket_itself_is_empty() {
        let resolver = IdentityResolver::new("/app/classes");
        assert!(matches!(
            resolver.resolve(Path::new("/app/classes")),
            Err(IdentityResolutionError::Empty { .. })
        ));
    }

    #[test]
    fn test_extension_only_is_empty() {
        let resolver = IdentityResolver::new("/app/classes");
        assert!(matches!(
            resolver.resolve(Path::new("/app/classes/.ext")),
            Err(IdentityResolutionError::Empty { .. })
        ));
    }

    #[test]
    fn test_outside_root() {
        let resolver = IdentityResolver::new("/app/classes");
        assert!(matches!(
            resolver.resolve(Path::new("/app/lib/Service/Bean.ext")),
            Err(IdentityResolutionError::OutsideRoot { .. })
        ));
        assert!(matches!(
            resolver.resolve(Path::new("/other/classes/Bean.ext")),
            Err(IdentityResolutionError::OutsideRoot { .. })
        ));
    }

    #[test]
    fn test_invalid_segment() {
        let resolver = IdentityResolver::new("/app/classes");
        assert!(matches!(
            resolver.resolve(Path::new("/app/classes/My Service/Bean.ext")),
            Err(IdentityResolutionError::Invalid { .. })
        ));
    }

    #[test]
    fn test_current_dir_root() {
        let resolver = IdentityResolver::new(".");
        let id = resolver
            .resolve(Path::new("./Service/PaymentBean.ext"))
            .unwrap();
        assert_eq!(id.as_str(), "Service\\PaymentBean");

        let other = resolver.resolve(Path::new("./Other/PaymentBean.ext")).unwrap();
        assert_ne!(id, other);
    }

    #[test]
    fn test_relative_root() {
        let resolver = IdentityResolver::new("./classes");
        let id = resolver
            .resolve(Path::new("./classes/Service/PaymentBean.ext"))
            .unwrap();
        assert_eq!(id.as_str(), "Service\\PaymentBean");

        let resolver = IdentityResolver::new("webapp/META-INF/classes");
        let id = resolver
            .resolve(Path::new("webapp/META-INF/classes/Service/PaymentBean.ext"))
            .unwrap();
        assert_eq!(id.as_str(), "Service\\PaymentBean");
    }

    #[test]
    fn test_only_last_extension_is_stripped() {
        let resolver = IdentityResolver::new("/app/classes");
        let id = resolver
            .resolve(Path::new("/app/classes/Service/Bean.class.ext"))
            .unwrap();
        assert_eq!(id.as_str(), "Service\\Bean.class");
    }
}
