//! Image reference ⇄ archive filename codec.
//!
//! Archive filenames must be filesystem-safe and carry enough of the
//! reference to rebuild a tag/push target later:
//!
//! - a registry host segment is kept but marked with `____` so import can
//!   strip it,
//! - remaining `/` become `__`, `:` becomes `@`, and `.tar` is appended.
//!
//! `registry.example.com/team/app:1.0` ⇄ `registry.example.com____team__app@1.0.tar`

use crate::{error::*, ImageName};

const EXTENSION: &str = ".tar";
const REGISTRY_MARK: &str = "____";
const PATH_SEPARATOR: &str = "__";

/// Archive filename for an image reference. A reference without an explicit
/// tag encodes without `@`, so decode can distinguish it and default to
/// `latest`.
pub fn encode(name: &ImageName) -> String {
    let mut out = String::new();
    if let Some(registry) = &name.registry {
        out.push_str(&registry.replace(':', "@"));
        out.push_str(REGISTRY_MARK);
    }
    for segment in &name.repository {
        out.push_str(&segment.replace(':', "@"));
        out.push_str(PATH_SEPARATOR);
    }
    out.push_str(&name.name);
    if let Some(tag) = &name.tag {
        out.push('@');
        out.push_str(tag);
    }
    out.push_str(EXTENSION);
    out
}

/// Components recovered from an archive filename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedArchive {
    /// Repository path and image name, registry host stripped. Used to build
    /// the push target under the mirror registry.
    pub image_name: String,
    /// Tag, `latest` if the filename carries none.
    pub tag: String,
    /// The full reference the runtime registered the archive under at load
    /// time, registry host included. `tag` must address the loaded image by
    /// this name, not by `image_name`.
    pub source_image: String,
}

pub fn decode(file_name: &str) -> Result<DecodedArchive> {
    let stem = file_name
        .strip_suffix(EXTENSION)
        .ok_or_else(|| Error::InvalidArchiveName(file_name.to_string()))?;
    if stem.is_empty() {
        return Err(Error::InvalidArchiveName(file_name.to_string()));
    }

    // Only the last `@` can be the tag separator, and only when it sits
    // after every path separator: an `@` from an encoded registry port is
    // always followed by `____`/`__`, while a tag never contains them.
    let (base, tag) = match stem.rsplit_once('@') {
        Some((_, tag)) if tag.is_empty() => {
            return Err(Error::InvalidArchiveName(file_name.to_string()));
        }
        Some((base, tag)) if !tag.contains(PATH_SEPARATOR) => (base, tag),
        _ => (stem, "latest"),
    };

    // Push target drops the registry host; everything after the mark is the
    // repository path.
    let image_name = match base.split_once(REGISTRY_MARK) {
        Some((_registry, path)) => path,
        None => base,
    }
    .replace(PATH_SEPARATOR, "/");

    let source_image = stem
        .replace(REGISTRY_MARK, "/")
        .replace(PATH_SEPARATOR, "/")
        .replace('@', ":");

    Ok(DecodedArchive {
        image_name,
        tag: tag.to_string(),
        source_image,
    })
}
