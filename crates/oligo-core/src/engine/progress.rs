/// Events emitted while a library is built.
///
/// Phases bracket one build step; tasks inside a phase report a step total
/// followed by one increment per step (one per overlap instance during the
/// uniqueness search, one per gene realization during verification).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Progress {
    PhaseStart { name: &'static str },
    PhaseFinish,

    TaskStart { total_steps: u64 },
    TaskIncrement,
    TaskFinish,

    Message(String),
}

pub type ProgressCallback<'a> = Box<dyn Fn(Progress) + Send + Sync + 'a>;

#[derive(Default)]
pub struct ProgressReporter<'a> {
    callback: Option<ProgressCallback<'a>>,
}

impl<'a> ProgressReporter<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_callback(callback: ProgressCallback<'a>) -> Self {
        Self {
            callback: Some(callback),
        }
    }

    #[inline]
    pub fn report(&self, event: Progress) {
        if let Some(cb) = &self.callback {
            cb(event);
        }
    }

    /// Runs `step` between a `PhaseStart` and a `PhaseFinish` event. The
    /// finish event is only sent when `step` succeeds.
    pub fn phase<T, E>(&self, name: &'static str, step: impl FnOnce() -> Result<T, E>) -> Result<T, E> {
        self.report(Progress::PhaseStart { name });
        let result = step()?;
        self.report(Progress::PhaseFinish);
        Ok(result)
    }
}
