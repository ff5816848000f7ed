//! Fixed timestep simulation tick
//!
//! One call advances the session by exactly one step. Rules run in a fixed
//! order (floor/ceiling, side walls, paddle, blocks, movement) and that order
//! decides which reflection wins when several apply in the same tick. A ball
//! that would drop out ends the game before anything else is evaluated.

use super::collision::{falls_out, hits_ceiling, hits_side_wall, resolve_side};
use super::state::{GameEvent, Session, Terminal};

/// Advance the session by one fixed step
///
/// Returns the terminal signal if this tick ended the session. When a signal
/// is returned the ball has not moved this tick.
pub fn tick(session: &mut Session) -> Option<Terminal> {
    session.time_ticks += 1;

    let diameter = session.playfield.ball_diameter;
    let step = session.ball.step();

    // Floor and ceiling
    let next_top = session.ball.top() + step.y;
    if hits_ceiling(next_top) {
        session.ball.rise = -session.ball.rise;
        session.events.push(GameEvent::CeilingBounce);
        log::trace!("Tick {}: ceiling bounce", session.time_ticks);
    } else if falls_out(next_top, session.playfield.height, diameter) {
        session.events.push(GameEvent::Lost);
        log::info!("Ball lost after {} ticks", session.time_ticks);
        return Some(Terminal::Lost);
    }

    // Side walls
    let next_left = session.ball.left() + step.x;
    if hits_side_wall(next_left, session.playfield.width, diameter) {
        session.ball.run = -session.ball.run;
        session.events.push(GameEvent::WallBounce);
        log::trace!("Tick {}: wall bounce", session.time_ticks);
    }

    // Collisions use the pre-move box
    let ball_box = session.ball_bounds();

    // Paddle
    if session.ball.paddle_cooldown > 0 {
        session.ball.paddle_cooldown -= 1;
    } else if ball_box.overlaps(&session.paddle.bounds()) {
        session.ball.rise = -session.ball.rise;
        session
            .ball
            .accelerate(session.tuning.paddle_boost, session.tuning.max_velocity);
        session.ball.paddle_cooldown = session.tuning.paddle_cooldown_ticks;
        session.events.push(GameEvent::PaddleHit {
            velocity: session.ball.velocity,
        });
        log::debug!("Paddle hit, velocity now {:.3}", session.ball.velocity);
    }

    // Blocks: envelope first, then first overlapping block in slot order
    if !session.blocks.rejects(&ball_box) {
        if let Some(slot) = session.blocks.first_hit(&ball_box) {
            let block_box = session.blocks.slots()[slot].rect;
            let side = resolve_side(&ball_box, &block_box);
            session.blocks.remove(slot);

            if side.flips_rise() {
                session.ball.rise = -session.ball.rise;
            } else {
                session.ball.run = -session.ball.run;
            }
            session.events.push(GameEvent::BlockDestroyed { slot, side });
            log::debug!(
                "Block {:?} destroyed from {:?}, {} remaining",
                session.blocks.cell(slot),
                side,
                session.blocks.alive_count()
            );

            if session.blocks.is_empty() {
                session.events.push(GameEvent::Won);
                log::info!("All blocks cleared after {} ticks", session.time_ticks);
                return Some(Terminal::Won);
            }
        }
    }

    // Move with the (possibly flipped) direction
    let step = session.ball.step();
    session.ball.pos += step;

    None
}
