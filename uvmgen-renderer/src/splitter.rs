//! Marker-based splitting of one rendered blob into named segments.
//!
//! A blob is scanned line by line. A line containing a descriptor's marker
//! opens that descriptor's segment (the marker line is its first line) and
//! closes whatever segment was open. Lines outside any segment are dropped,
//! and end of input closes the last segment.
//!
//! ```text
//! intro                 <- dropped
//! // File: x_a          <- segment a
//! AAA                   <- segment a
//! // File: x_b          <- segment b
//! BBB                   <- segment b
//! ```
//!
//! [`split`] is pure: no filesystem, no logging. Callers decide what a
//! [`Segment::Missing`] means.

use thiserror::Error;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// One expected output file within a blob.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ComponentDescriptor {
    /// Appended to the owner's name to form the file name.
    pub file_name_suffix: String,
    /// Literal text that starts this component's segment.
    pub marker: String,
}

impl ComponentDescriptor {
    pub fn new(file_name_suffix: impl Into<String>, marker: impl Into<String>) -> Self {
        Self {
            file_name_suffix: file_name_suffix.into(),
            marker: marker.into(),
        }
    }
}

/// Result of splitting for one descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Segment lines joined with `\n`, marker line first, no trailing newline.
    Found(String),
    /// The marker never appeared in the blob.
    Missing,
}

impl Segment {
    pub fn is_found(&self) -> bool {
        matches!(self, Segment::Found(_))
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Segment::Found(text) => Some(text),
            Segment::Missing => None,
        }
    }
}

/// Everything [`split`] learned about a blob.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitOutcome {
    /// One entry per descriptor, in the order the descriptors were given.
    pub segments: Vec<(ComponentDescriptor, Segment)>,
    /// Markers that occurred again after their segment was already taken.
    /// Each repeat closes the open segment; lines up to the next fresh marker
    /// are dropped.
    pub repeated_markers: Vec<String>,
}

impl SplitOutcome {
    /// Segment for the descriptor with this suffix.
    pub fn get(&self, file_name_suffix: &str) -> Option<&Segment> {
        self.segments
            .iter()
            .find(|(d, _)| d.file_name_suffix == file_name_suffix)
            .map(|(_, s)| s)
    }

    /// Descriptors whose marker never appeared.
    pub fn missing(&self) -> impl Iterator<Item = &ComponentDescriptor> {
        self.segments
            .iter()
            .filter(|(_, s)| !s.is_found())
            .map(|(d, _)| d)
    }
}

/// A descriptor set that cannot be split unambiguously.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SplitError {
    #[error("marker for component '{suffix}' is empty")]
    EmptyMarker { suffix: String },

    #[error("components '{first}' and '{second}' share the marker '{marker}'")]
    DuplicateMarker {
        first: String,
        second: String,
        marker: String,
    },

    #[error("marker '{inner}' of component '{inner_suffix}' occurs inside marker '{outer}' of component '{outer_suffix}'")]
    OverlappingMarker {
        inner_suffix: String,
        inner: String,
        outer_suffix: String,
        outer: String,
    },
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Reject descriptor sets whose markers are empty, shared, or nested.
///
/// With this guarantee a line can match at most one marker at any given
/// position, so the outcome never depends on descriptor order.
pub fn validate_descriptors(descriptors: &[ComponentDescriptor]) -> Result<(), SplitError> {
    for (i, a) in descriptors.iter().enumerate() {
        if a.marker.is_empty() {
            return Err(SplitError::EmptyMarker {
                suffix: a.file_name_suffix.clone(),
            });
        }
        for b in &descriptors[i + 1..] {
            if a.marker == b.marker {
                return Err(SplitError::DuplicateMarker {
                    first: a.file_name_suffix.clone(),
                    second: b.file_name_suffix.clone(),
                    marker: a.marker.clone(),
                });
            }
            let (inner, outer) = if b.marker.contains(&a.marker) {
                (a, b)
            } else if a.marker.contains(&b.marker) {
                (b, a)
            } else {
                continue;
            };
            return Err(SplitError::OverlappingMarker {
                inner_suffix: inner.file_name_suffix.clone(),
                inner: inner.marker.clone(),
                outer_suffix: outer.file_name_suffix.clone(),
                outer: outer.marker.clone(),
            });
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Split
// ---------------------------------------------------------------------------

/// Partition `blob` into one segment per descriptor.
///
/// Line terminators (`\n` or `\r\n`) are not part of any segment; segments
/// are re-joined with `\n`.
pub fn split(blob: &str, descriptors: &[ComponentDescriptor]) -> Result<SplitOutcome, SplitError> {
    validate_descriptors(descriptors)?;

    let mut collected: Vec<Option<Vec<&str>>> = vec![None; descriptors.len()];
    let mut repeated_markers = Vec::new();
    let mut active: Option<usize> = None;

    for line in blob.lines() {
        match marker_in(line, descriptors) {
            Some(idx) if collected[idx].is_some() => {
                repeated_markers.push(descriptors[idx].marker.clone());
                active = None;
            }
            Some(idx) => {
                collected[idx] = Some(vec![line]);
                active = Some(idx);
            }
            None => {
                if let Some(lines) = active.and_then(|idx| collected[idx].as_mut()) {
                    lines.push(line);
                }
            }
        }
    }

    let segments = descriptors
        .iter()
        .cloned()
        .zip(collected)
        .map(|(descriptor, lines)| {
            let segment = match lines {
                Some(lines) => Segment::Found(lines.join("\n")),
                None => Segment::Missing,
            };
            (descriptor, segment)
        })
        .collect();

    Ok(SplitOutcome {
        segments,
        repeated_markers,
    })
}

/// Index of the descriptor whose marker occurs earliest in `line`.
fn marker_in(line: &str, descriptors: &[ComponentDescriptor]) -> Option<usize> {
    descriptors
        .iter()
        .enumerate()
        .filter_map(|(idx, d)| line.find(d.marker.as_str()).map(|pos| (pos, idx)))
        .min()
        .map(|(_, idx)| idx)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const BLOB: &str = "intro\n// File: x_a\nAAA\n// File: x_b\nBBB\n";

    fn a() -> ComponentDescriptor {
        ComponentDescriptor::new("a", "// File: x_a")
    }

    fn b() -> ComponentDescriptor {
        ComponentDescriptor::new("b", "// File: x_b")
    }

    fn c() -> ComponentDescriptor {
        ComponentDescriptor::new("c", "// File: x_c")
    }

    #[test]
    fn splits_two_segments_and_drops_leading_lines() {
        let outcome = split(BLOB, &[a(), b()]).unwrap();
        assert_eq!(outcome.get("a"), Some(&Segment::Found("// File: x_a\nAAA".into())));
        assert_eq!(outcome.get("b"), Some(&Segment::Found("// File: x_b\nBBB".into())));
        assert!(outcome.repeated_markers.is_empty());
    }

    #[test]
    fn absent_marker_is_missing() {
        let outcome = split(BLOB, &[c()]).unwrap();
        assert_eq!(outcome.get("c"), Some(&Segment::Missing));
        assert_eq!(outcome.missing().count(), 1);
    }

    #[test]
    fn missing_marker_does_not_affect_others() {
        let outcome = split(BLOB, &[a(), c(), b()]).unwrap();
        assert!(outcome.get("a").unwrap().is_found());
        assert!(outcome.get("b").unwrap().is_found());
        let missing: Vec<_> = outcome.missing().map(|d| d.file_name_suffix.as_str()).collect();
        assert_eq!(missing, ["c"]);
    }

    #[test]
    fn descriptor_order_does_not_change_content() {
        let forward = split(BLOB, &[a(), b(), c()]).unwrap();
        let backward = split(BLOB, &[c(), b(), a()]).unwrap();
        for suffix in ["a", "b", "c"] {
            assert_eq!(forward.get(suffix), backward.get(suffix), "suffix {suffix}");
        }
    }

    #[test]
    fn segments_are_disjoint_and_cover_kept_lines() {
        let blob = "header\n\n// File: x_b\nb1\n\nb2\n// File: x_a\na1\n// File: x_c\n";
        let outcome = split(blob, &[a(), b(), c()]).unwrap();

        // Marker occurrence order is b, a, c.
        let mut rebuilt = Vec::new();
        for suffix in ["b", "a", "c"] {
            rebuilt.push(outcome.get(suffix).unwrap().as_text().unwrap().to_string());
        }
        let kept: Vec<&str> = blob.lines().skip(2).collect();
        assert_eq!(rebuilt.join("\n"), kept.join("\n"));
    }

    #[test]
    fn marker_matches_anywhere_in_line() {
        let outcome = split("  // File: x_a  \nbody", &[a()]).unwrap();
        assert_eq!(outcome.get("a"), Some(&Segment::Found("  // File: x_a  \nbody".into())));
    }

    #[test]
    fn crlf_input_is_joined_with_lf() {
        let outcome = split("// File: x_a\r\nAAA\r\n", &[a()]).unwrap();
        assert_eq!(outcome.get("a"), Some(&Segment::Found("// File: x_a\nAAA".into())));
    }

    #[test]
    fn repeated_marker_keeps_first_segment_and_drops_following_lines() {
        let blob = "// File: x_a\nfirst\n// File: x_a\nsecond\n// File: x_b\nBBB";
        let outcome = split(blob, &[a(), b()]).unwrap();
        assert_eq!(outcome.get("a"), Some(&Segment::Found("// File: x_a\nfirst".into())));
        assert_eq!(outcome.get("b"), Some(&Segment::Found("// File: x_b\nBBB".into())));
        assert_eq!(outcome.repeated_markers, vec!["// File: x_a".to_string()]);
    }

    #[test]
    fn line_with_two_markers_belongs_to_the_earlier_one() {
        let blob = "// File: x_b // File: x_a\nbody";
        let outcome = split(blob, &[a(), b()]).unwrap();
        assert!(outcome.get("b").unwrap().is_found());
        assert_eq!(outcome.get("a"), Some(&Segment::Missing));
    }

    #[test]
    fn empty_blob_makes_everything_missing() {
        let outcome = split("", &[a(), b()]).unwrap();
        assert_eq!(outcome.missing().count(), 2);
    }

    #[rstest]
    #[case::empty(vec![ComponentDescriptor::new("a", "")])]
    #[case::duplicate(vec![a(), ComponentDescriptor::new("a2", "// File: x_a")])]
    #[case::nested(vec![a(), ComponentDescriptor::new("ab", "// File: x_ab")])]
    #[case::nested_reverse(vec![ComponentDescriptor::new("ab", "// File: x_ab"), a()])]
    fn ambiguous_descriptor_sets_are_rejected(#[case] descriptors: Vec<ComponentDescriptor>) {
        assert!(validate_descriptors(&descriptors).is_err());
        assert!(split(BLOB, &descriptors).is_err());
    }

    #[test]
    fn nested_marker_error_names_both_components() {
        let err = validate_descriptors(&[
            ComponentDescriptor::new("ab", "// File: x_ab"),
            a(),
        ])
        .unwrap_err();
        assert_eq!(
            err,
            SplitError::OverlappingMarker {
                inner_suffix: "a".into(),
                inner: "// File: x_a".into(),
                outer_suffix: "ab".into(),
                outer: "// File: x_ab".into(),
            }
        );
    }
}
