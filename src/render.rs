//! Render sink interface
//!
//! Frontends implement [`RenderSink`] to mirror the session's geometry. The
//! sink is strictly downstream: it is handed positions and removals and never
//! reports geometry back to the simulation.

use crate::game::GamePhase;
use crate::sim::{Ball, Block, GameEvent, Paddle, Session};

/// Visual mirror of the simulation
pub trait RenderSink {
    /// Lay out the full block grid at session start
    fn draw_blocks(&mut self, blocks: &[Block]);
    fn draw_ball(&mut self, ball: &Ball, diameter: f32);
    fn draw_paddle(&mut self, paddle: &Paddle);
    fn remove_block(&mut self, slot: usize);
    fn show_phase(&mut self, phase: GamePhase);
}

/// Push a freshly started session to the sink
pub fn present_session<R: RenderSink + ?Sized>(sink: &mut R, session: &Session) {
    sink.draw_blocks(session.blocks.slots());
    sink.draw_paddle(&session.paddle);
    sink.draw_ball(&session.ball, session.playfield.ball_diameter);
}

/// Drain the session's events and push the resulting changes to the sink
pub fn present_frame<R: RenderSink + ?Sized>(sink: &mut R, session: &mut Session) {
    for event in session.drain_events() {
        if let GameEvent::BlockDestroyed { slot, .. } = event {
            sink.remove_block(slot);
        }
    }
    sink.draw_paddle(&session.paddle);
    sink.draw_ball(&session.ball, session.playfield.ball_diameter);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use crate::sim::{Rect, tick};
    use glam::Vec2;

    #[derive(Default)]
    struct Recorder {
        blocks: usize,
        removed: Vec<usize>,
        ball: Option<Vec2>,
        paddle: Option<f32>,
    }

    impl RenderSink for Recorder {
        fn draw_blocks(&mut self, blocks: &[Block]) {
            self.blocks = blocks.len();
        }
        fn draw_ball(&mut self, ball: &Ball, _diameter: f32) {
            self.ball = Some(ball.pos);
        }
        fn draw_paddle(&mut self, paddle: &Paddle) {
            self.paddle = Some(paddle.position);
        }
        fn remove_block(&mut self, slot: usize) {
            self.removed.push(slot);
        }
        fn show_phase(&mut self, _phase: GamePhase) {}
    }

    #[test]
    fn test_frame_mirrors_removals() {
        let mut session = Session::new(&Settings::default(), 9).unwrap();
        let mut sink = Recorder::default();
        present_session(&mut sink, &session);
        assert_eq!(sink.blocks, 15);

        // Drop the ball onto block 12 from below
        let target: Rect = session.blocks.slots()[12].rect;
        let start = Vec2::new(target.left() + 10.0, target.bottom() - 2.0);
        session.ball = Ball::new(start, -1.0, 0.0, 3.0);
        tick(&mut session);
        present_frame(&mut sink, &mut session);

        assert_eq!(sink.removed, vec![12]);
        assert_eq!(sink.ball, Some(session.ball.pos));
        assert!(session.events.is_empty());
    }
}
