//! Naming conventions that identify mirror (copy) events.
//!
//! There is no stored link between an original event and its mirror. The
//! relationship is re-derived every run from the title prefix, the
//! provenance tag at the start of the description, and equal start/end.

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_MIRROR_PREFIX, DEFAULT_TAG_PREFIX, DEFAULT_TAG_SUFFIX};
use crate::event::Event;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MirrorNaming {
    pub mirror_prefix: String,
    pub tag_prefix: String,
    pub tag_suffix: String,
}

impl Default for MirrorNaming {
    fn default() -> Self {
        MirrorNaming {
            mirror_prefix: DEFAULT_MIRROR_PREFIX.to_string(),
            tag_prefix: DEFAULT_TAG_PREFIX.to_string(),
            tag_suffix: DEFAULT_TAG_SUFFIX.to_string(),
        }
    }
}

impl MirrorNaming {
    pub fn mirror_title(&self, original_title: &str) -> String {
        format!("{}{}", self.mirror_prefix, original_title)
    }

    pub fn is_mirror_title(&self, title: &str) -> bool {
        title.starts_with(&self.mirror_prefix)
    }

    /// Title of the original event a mirror stands in for.
    pub fn original_title<'a>(&self, mirror_title: &'a str) -> Option<&'a str> {
        mirror_title.strip_prefix(&self.mirror_prefix)
    }

    /// Provenance tag naming the source calendar.
    pub fn tag(&self, source: &str) -> String {
        format!("{}{}{}", self.tag_prefix, source, self.tag_suffix)
    }

    /// Description a mirror must carry for the given original description.
    pub fn mirror_description(&self, source: &str, original_description: &str) -> String {
        format!("{}\n{}", self.tag(source), original_description)
    }

    /// Split a tagged description into `(source, original description)`.
    ///
    /// Returns `None` when the description does not start with the tag.
    pub fn parse_description<'a>(&self, description: &'a str) -> Option<(&'a str, &'a str)> {
        let rest = description.strip_prefix(&self.tag_prefix)?;
        let terminator = format!("{}\n", self.tag_suffix);
        let end = rest.find(&terminator)?;
        Some((&rest[..end], &rest[end + terminator.len()..]))
    }
}

/// Whether `mirror` is the mirror of `original`: same start and end, and a
/// title equal to the original's title with the mirror prefix.
pub fn same_occurrence(original: &Event, mirror: &Event, naming: &MirrorNaming) -> bool {
    original.start == mirror.start
        && original.end == mirror.end
        && naming.original_title(&mirror.title) == Some(original.title.as_str())
}
