use crate::part::MimePart;

/// Verdict handed back to a classifier as training feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verdict {
    Junk,
    NotJunk,
}

impl Verdict {
    pub fn is_junk(&self) -> bool {
        matches!(self, Verdict::Junk)
    }
}

impl From<bool> for Verdict {
    fn from(junk: bool) -> Self {
        match junk {
            true => Verdict::Junk,
            false => Verdict::NotJunk,
        }
    }
}

/// A junk classifier consulted on fully parsed messages.
///
/// Nothing in this crate calls these methods: a mail client hands the
/// `root` of a [`crate::part::ParseResult`] to its filter once parsing is
/// done. Feedback may be buffered until [`JunkFilter::commit_feedback`].
pub trait JunkFilter {
    fn is_junk(&self, root: &MimePart) -> bool;

    fn report_feedback(&mut self, root: &MimePart, verdict: Verdict);

    fn commit_feedback(&mut self);
}

impl<F: JunkFilter + ?Sized> JunkFilter for Box<F> {
    fn is_junk(&self, root: &MimePart) -> bool {
        (**self).is_junk(root)
    }

    fn report_feedback(&mut self, root: &MimePart, verdict: Verdict) {
        (**self).report_feedback(root, verdict)
    }

    fn commit_feedback(&mut self) {
        (**self).commit_feedback()
    }
}
