use crate::error::*;
use std::fmt;

/// A container image reference, `[registry[:port]/]path/name[:tag]`.
///
/// The first segment counts as a registry host only when at least two more
/// segments follow it; `team/app` is a repository path, not a host.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImageName {
    pub registry: Option<String>,
    pub repository: Vec<String>,
    pub name: String,
    pub tag: Option<String>,
}

impl ImageName {
    pub fn parse(reference: &str) -> Result<Self> {
        let reference = reference.trim();
        if reference.is_empty() {
            return Err(Error::InvalidReference(reference.to_string()));
        }
        let mut segments: Vec<&str> = reference.split('/').collect();
        if segments.iter().any(|s| s.is_empty()) {
            return Err(Error::InvalidReference(reference.to_string()));
        }
        // Only the last segment may carry a tag; a colon earlier in the
        // reference is a registry port.
        let last = segments.pop().unwrap_or(reference);
        let (name, tag) = match last.split_once(':') {
            Some((name, tag)) if !name.is_empty() && !tag.is_empty() => (name, Some(tag)),
            Some(_) => return Err(Error::InvalidReference(reference.to_string())),
            None => (last, None),
        };
        let registry = if segments.len() >= 2 {
            Some(segments.remove(0).to_string())
        } else {
            None
        };
        Ok(ImageName {
            registry,
            repository: segments.into_iter().map(str::to_string).collect(),
            name: name.to_string(),
            tag: tag.map(str::to_string),
        })
    }

    pub fn tag_or_latest(&self) -> &str {
        self.tag.as_deref().unwrap_or("latest")
    }
}

impl fmt::Display for ImageName {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if let Some(registry) = &self.registry {
            write!(f, "{}/", registry)?;
        }
        for segment in &self.repository {
            write!(f, "{}/", segment)?;
        }
        write!(f, "{}", self.name)?;
        if let Some(tag) = &self.tag {
            write!(f, ":{}", tag)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn image_name() -> Result<()> {
        let name = ImageName::parse("registry.example.com/team/app:1.0")?;
        assert_eq!(
            name,
            ImageName {
                registry: Some("registry.example.com".to_string()),
                repository: vec!["team".to_string()],
                name: "app".to_string(),
                tag: Some("1.0".to_string()),
            }
        );

        let name = ImageName::parse("localhost:5000/team/app:1.0")?;
        assert_eq!(
            name,
            ImageName {
                registry: Some("localhost:5000".to_string()),
                repository: vec!["team".to_string()],
                name: "app".to_string(),
                tag: Some("1.0".to_string()),
            }
        );

        // One slash: repository path only, no host inferred.
        let name = ImageName::parse("team/app:1.0")?;
        assert_eq!(
            name,
            ImageName {
                registry: None,
                repository: vec!["team".to_string()],
                name: "app".to_string(),
                tag: Some("1.0".to_string()),
            }
        );

        let name = ImageName::parse("alpine")?;
        assert_eq!(
            name,
            ImageName {
                registry: None,
                repository: Vec::new(),
                name: "alpine".to_string(),
                tag: None,
            }
        );
        assert_eq!(name.tag_or_latest(), "latest");

        Ok(())
    }

    #[test]
    fn display_roundtrip() -> Result<()> {
        for reference in [
            "alpine",
            "ubuntu:20.04",
            "team/app:1.0",
            "registry.example.com/team/app:1.0",
            "localhost:5000/a/b/c",
        ] {
            assert_eq!(ImageName::parse(reference)?.to_string(), reference);
        }
        Ok(())
    }

    #[test]
    fn invalid() {
        assert!(ImageName::parse("").is_err());
        assert!(ImageName::parse("a//b").is_err());
        assert!(ImageName::parse("app:").is_err());
    }
}
