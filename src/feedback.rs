//! Cues the engine hands back to the presentation layer after a mutation.
//!
//! The engine never plays anything itself: every successful action returns
//! the cues it produced, and the caller forwards them to a [`FeedbackSink`].

use crate::model::SectorId;

pub const SOUND_CATEGORY_ACTIONS: &str = "actions";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feedback {
    BuyBasic,
    BuyShop,
    ClickBasic,
    HoverBasic,
    Arrow,
    Hold,
    HoldEnd,
    SectorUnlocked(SectorId),
    RabbitKilled,
    SearchFinished(SectorId),
    GameEnded,
}

impl Feedback {
    /// `(category, name)` of the sound bound to this cue, if any.
    pub fn sound(self) -> Option<(&'static str, &'static str)> {
        let name = match self {
            Self::BuyBasic => "buy-basic",
            Self::BuyShop | Self::SectorUnlocked(_) => "buy-shop",
            Self::ClickBasic => "click-basic",
            Self::HoverBasic => "hover-basic",
            Self::Arrow | Self::RabbitKilled => "arrow",
            Self::Hold => "hold",
            Self::HoldEnd => "hold-end",
            Self::SearchFinished(_) | Self::GameEnded => return None,
        };
        Some((SOUND_CATEGORY_ACTIONS, name))
    }
}

/// Fire-and-forget consumer of feedback cues.
pub trait FeedbackSink {
    fn play(&mut self, feedback: Feedback);

    fn play_all(&mut self, cues: &[Feedback]) {
        for cue in cues {
            self.play(*cue);
        }
    }
}

/// Sink that writes each cue to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogFeedback;

impl FeedbackSink for LogFeedback {
    fn play(&mut self, feedback: Feedback) {
        match feedback.sound() {
            Some((category, name)) => log::debug!("feedback {feedback:?} -> {category}/{name}"),
            None => log::debug!("feedback {feedback:?}"),
        }
    }
}

impl FeedbackSink for Vec<Feedback> {
    fn play(&mut self, feedback: Feedback) {
        self.push(feedback);
    }
}

#[cfg(test)]
mod tests {
    use super::{Feedback, FeedbackSink};
    use crate::model::SectorId;

    #[test]
    fn sector_unlock_shares_the_shop_sound() {
        assert_eq!(
            Feedback::SectorUnlocked(SectorId::Laboratory).sound(),
            Feedback::BuyShop.sound()
        );
        assert_eq!(Feedback::GameEnded.sound(), None);
    }

    #[test]
    fn collecting_sink_keeps_order() {
        let mut sink: Vec<Feedback> = Vec::new();
        sink.play_all(&[Feedback::Hold, Feedback::HoldEnd]);
        assert_eq!(sink, vec![Feedback::Hold, Feedback::HoldEnd]);
    }
}
