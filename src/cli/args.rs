//! Command-line argument definitions

use std::path::PathBuf;
use std::str::FromStr;

use clap::Args;

use crate::domain::model::BoundsUpdate;
use crate::utils::parse_time;

/// Arguments for the probe command
#[derive(Args, Debug)]
pub struct ProbeArgs {
    /// Media file to probe
    #[arg(short, long)]
    pub input: PathBuf,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Arguments shared by the plan and render commands
#[derive(Args, Debug)]
pub struct TimelineArgs {
    /// Source clip in timeline order: PATH[@START-END], either bound optional
    /// (times as seconds, MM:SS or HH:MM:SS)
    #[arg(short, long = "clip", required = true)]
    pub clips: Vec<ClipSpec>,

    /// Output file path; the container follows its extension
    #[arg(short, long)]
    pub output: PathBuf,
}

/// One `--clip` value: a source path plus optional trim bounds
#[derive(Debug, Clone, PartialEq)]
pub struct ClipSpec {
    pub path: PathBuf,
    pub start: Option<f64>,
    pub end: Option<f64>,
}

impl ClipSpec {
    pub fn bounds(&self) -> BoundsUpdate {
        BoundsUpdate {
            start: self.start,
            end: self.end,
        }
    }
}

impl FromStr for ClipSpec {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() {
            return Err("clip path cannot be empty".to_string());
        }

        // A suffix that does not parse as a range is part of the path
        let Some((path, start, end)) = split_range(s) else {
            return Ok(Self {
                path: PathBuf::from(s),
                start: None,
                end: None,
            });
        };

        if let (Some(start), Some(end)) = (start, end) {
            if start >= end {
                return Err(format!("clip range start {} must be before end {}", start, end));
            }
        }

        Ok(Self {
            path: PathBuf::from(path),
            start,
            end,
        })
    }
}

fn split_range(s: &str) -> Option<(&str, Option<f64>, Option<f64>)> {
    let (path, range) = s.rsplit_once('@')?;
    let (start, end) = range.split_once('-')?;
    if path.is_empty() {
        return None;
    }
    Some((path, parse_bound(start)?, parse_bound(end)?))
}

/// `Some(None)` for an open bound, `None` when the text is not a time
fn parse_bound(value: &str) -> Option<Option<f64>> {
    if value.trim().is_empty() {
        return Some(None);
    }
    parse_time(value).ok().map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clip_spec_forms() {
        let spec: ClipSpec = "a.mp4".parse().unwrap();
        assert_eq!(spec.path, PathBuf::from("a.mp4"));
        assert_eq!((spec.start, spec.end), (None, None));

        let spec: ClipSpec = "/media/b.mp4@5-15".parse().unwrap();
        assert_eq!(spec.path, PathBuf::from("/media/b.mp4"));
        assert_eq!((spec.start, spec.end), (Some(5.0), Some(15.0)));

        let spec: ClipSpec = "c.mov@1:00-".parse().unwrap();
        assert_eq!((spec.start, spec.end), (Some(60.0), None));

        let spec: ClipSpec = "d.mov@-2.5".parse().unwrap();
        assert_eq!((spec.start, spec.end), (None, Some(2.5)));
    }

    #[test]
    fn test_at_sign_without_range_is_part_of_path() {
        let spec: ClipSpec = "shots/take@home.mp4".parse().unwrap();
        assert_eq!(spec.path, PathBuf::from("shots/take@home.mp4"));
        assert!(spec.bounds().is_empty());
    }

    #[test]
    fn test_inverted_range_is_rejected() {
        assert!("a.mp4@10-5".parse::<ClipSpec>().is_err());
        assert!("".parse::<ClipSpec>().is_err());
    }
}
