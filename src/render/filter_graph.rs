//! ffmpeg argument construction for render jobs
//!
//! The same job always produces the same argument vector: inputs in segment
//! order, one trim/atrim pair per segment, one concat at the end.

use std::path::Path;

use crate::render::RenderJob;

/// Builds the ffmpeg invocation for a [`RenderJob`]
#[derive(Debug, Clone, Default)]
pub struct FfmpegCommandBuilder {
    threads: Option<usize>,
    progress_pipe: bool,
}

impl FfmpegCommandBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cap encoder threads
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = Some(threads);
        self
    }

    /// Emit machine-readable progress on stdout
    pub fn with_progress_pipe(mut self) -> Self {
        self.progress_pipe = true;
        self
    }

    /// The `-filter_complex` graph trimming and concatenating every segment
    pub fn filter_complex(job: &RenderJob) -> String {
        let mut chains = Vec::with_capacity(job.segments.len() * 2 + 1);
        let mut concat_inputs = String::new();

        for (index, segment) in job.segments.iter().enumerate() {
            let start = seconds(segment.trim_start);
            let end = seconds(segment.trim_end);

            chains.push(format!(
                "[{index}:v]trim=start={start}:end={end},setpts=PTS-STARTPTS[v{index}]"
            ));
            if segment.has_audio {
                chains.push(format!(
                    "[{index}:a]atrim=start={start}:end={end},asetpts=PTS-STARTPTS[a{index}]"
                ));
            } else {
                chains.push(format!(
                    "anullsrc=channel_layout=stereo:sample_rate=48000,atrim=duration={},asetpts=PTS-STARTPTS[a{index}]",
                    seconds(segment.duration())
                ));
            }
            concat_inputs.push_str(&format!("[v{index}][a{index}]"));
        }

        chains.push(format!(
            "{concat_inputs}concat=n={}:v=1:a=1[outv][outa]",
            job.segments.len()
        ));
        chains.join(";")
    }

    /// Full argument vector, writing to `output` rather than the job's path
    ///
    /// The render adapter passes a temporary sibling here and publishes it
    /// under the job's path only after ffmpeg succeeds.
    pub fn args_for(&self, job: &RenderJob, output: &Path) -> Vec<String> {
        let mut args: Vec<String> = vec!["-hide_banner".into(), "-nostdin".into(), "-y".into()];

        for segment in &job.segments {
            args.push("-i".into());
            args.push(segment.source_path.to_string_lossy().into_owned());
        }

        args.push("-filter_complex".into());
        args.push(Self::filter_complex(job));
        args.extend(["-map", "[outv]", "-map", "[outa]"].map(String::from));

        if let Some(threads) = self.threads {
            args.push("-threads".into());
            args.push(threads.to_string());
        }

        if self.progress_pipe {
            args.extend(["-progress", "pipe:1", "-nostats"].map(String::from));
        }

        args.push(output.to_string_lossy().into_owned());
        args
    }

    /// Argument vector writing directly to the job's output path
    pub fn args(&self, job: &RenderJob) -> Vec<String> {
        self.args_for(job, job.output())
    }
}

/// Seconds as ffmpeg reads them; shortest exact decimal form
fn seconds(value: f64) -> String {
    format!("{}", value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::RenderSegment;
    use std::path::PathBuf;

    fn segment(path: &str, start: f64, end: f64, has_audio: bool) -> RenderSegment {
        RenderSegment {
            source_path: PathBuf::from(path),
            trim_start: start,
            trim_end: end,
            has_audio,
        }
    }

    fn job() -> RenderJob {
        RenderJob {
            segments: vec![segment("a.mp4", 0.0, 10.0, true), segment("b.mp4", 5.0, 15.5, true)],
            output: PathBuf::from("out.mp4"),
        }
    }

    #[test]
    fn test_filter_complex_trims_and_concats_in_order() {
        assert_eq!(
            FfmpegCommandBuilder::filter_complex(&job()),
            "[0:v]trim=start=0:end=10,setpts=PTS-STARTPTS[v0];\
             [0:a]atrim=start=0:end=10,asetpts=PTS-STARTPTS[a0];\
             [1:v]trim=start=5:end=15.5,setpts=PTS-STARTPTS[v1];\
             [1:a]atrim=start=5:end=15.5,asetpts=PTS-STARTPTS[a1];\
             [v0][a0][v1][a1]concat=n=2:v=1:a=1[outv][outa]"
        );
    }

    #[test]
    fn test_filter_complex_fills_missing_audio_with_silence() {
        let job = RenderJob {
            segments: vec![segment("silent.mp4", 2.0, 4.5, false)],
            output: PathBuf::from("out.mp4"),
        };
        let graph = FfmpegCommandBuilder::filter_complex(&job);
        assert!(graph.contains("anullsrc=channel_layout=stereo:sample_rate=48000,atrim=duration=2.5"));
        assert!(!graph.contains("[0:a]"));
    }

    #[test]
    fn test_args_layout() {
        let args = FfmpegCommandBuilder::new()
            .with_threads(4)
            .with_progress_pipe()
            .args(&job());

        assert_eq!(&args[..3], &["-hide_banner", "-nostdin", "-y"]);
        assert_eq!(&args[3..7], &["-i", "a.mp4", "-i", "b.mp4"]);
        assert_eq!(args[7], "-filter_complex");
        assert!(args.windows(2).any(|pair| pair == ["-threads", "4"]));
        assert!(args.windows(2).any(|pair| pair == ["-progress", "pipe:1"]));
        assert_eq!(args.last().map(String::as_str), Some("out.mp4"));
    }

    #[test]
    fn test_args_for_overrides_output() {
        let args = FfmpegCommandBuilder::new().args_for(&job(), Path::new(".tmp-out.mp4"));
        assert_eq!(args.last().map(String::as_str), Some(".tmp-out.mp4"));
        assert!(!args.iter().any(|arg| arg == "-progress"));
    }
}
