use crate::{error::*, ImageName};
use serde::Deserialize;
use std::{fs, path::Path};

/// Image list configuration, `{"images": ["team/app:1.0", ...]}`.
#[derive(Debug, Clone, Deserialize)]
pub struct ImageList {
    pub images: Vec<String>,
}

impl ImageList {
    pub fn from_path(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(Error::NotAFile(path.to_path_buf()));
        }
        let f = fs::File::open(path)?;
        let list: ImageList = serde_json::from_reader(f)?;
        if list.images.is_empty() {
            return Err(Error::EmptyImageList(path.to_path_buf()));
        }
        Ok(list)
    }

    /// References are trusted input; a malformed entry aborts the run
    /// instead of being skipped like a batch item.
    pub fn image_names(&self) -> Result<Vec<ImageName>> {
        self.images.iter().map(|s| ImageName::parse(s)).collect()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::io::Write;

    fn write_config(content: &str) -> tempfile::NamedTempFile {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(content.as_bytes()).unwrap();
        f
    }

    #[test]
    fn load() -> Result<()> {
        let f = write_config(r#"{"images": ["alpine", "team/app:1.0"]}"#);
        let list = ImageList::from_path(f.path())?;
        assert_eq!(list.images.len(), 2);
        let names = list.image_names()?;
        assert_eq!(names[1].to_string(), "team/app:1.0");
        Ok(())
    }

    #[test]
    fn missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = ImageList::from_path(&dir.path().join("images.json")).unwrap_err();
        assert!(matches!(err, Error::NotAFile(_)));
    }

    #[test]
    fn invalid_json() {
        let f = write_config("not json");
        let err = ImageList::from_path(f.path()).unwrap_err();
        assert!(matches!(err, Error::InvalidJson(_)));
    }

    #[test]
    fn empty_image_list() {
        let f = write_config(r#"{"images": []}"#);
        let err = ImageList::from_path(f.path()).unwrap_err();
        assert!(matches!(err, Error::EmptyImageList(_)));
    }
}
