//! Session driver for interactive hosts

use crate::config::GameConfig;
use crate::session::{OpponentTicket, Session, Update};
use crate::timer::OpponentTimer;
use crate::types::{Coord, Status};

use std::time::Duration;

use rand::rngs::StdRng;
use rand::SeedableRng;

/// Callbacks of the host UI
pub trait Observer {
    /// Called whenever the board or the selection changes
    fn render(&mut self, _session: &Session) {}

    /// Called whenever the status line changes
    fn status(&mut self, _status: &Status) {}
}

impl Observer for () {}

fn make_rng(config: &GameConfig) -> StdRng {
    match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// Owns a [`Session`] and runs the delayed opponent moves for it
///
/// The opponent's move is waited for on a timer thread, but it is applied on the thread
/// which calls [`Driver::wait_opponent`] or [`Driver::poll`].
pub struct Driver<O: Observer> {
    session: Session,
    observer: O,
    rng: StdRng,
    timer: OpponentTimer,
}

impl<O: Observer> Driver<O> {
    /// Starts a new game and reports the initial position to `observer`
    pub fn new(config: GameConfig, mut observer: O) -> Driver<O> {
        let rng = make_rng(&config);
        let session = Session::new(config);
        observer.render(&session);
        observer.status(&session.status());
        Driver {
            session,
            observer,
            rng,
            timer: OpponentTimer::new(),
        }
    }

    #[inline]
    pub fn session(&self) -> &Session {
        &self.session
    }

    #[inline]
    pub fn observer(&self) -> &O {
        &self.observer
    }

    #[inline]
    pub fn observer_mut(&mut self) -> &mut O {
        &mut self.observer
    }

    /// Returns `true` if the opponent's move is scheduled but not applied yet
    #[inline]
    pub fn is_waiting(&self) -> bool {
        self.timer.is_pending()
    }

    fn dispatch(&mut self, update: Update) -> Update {
        if update.render {
            self.observer.render(&self.session);
        }
        if let Some(status) = &update.status {
            self.observer.status(status);
        }
        if let Some(ticket) = update.schedule {
            self.timer.arm(ticket, self.session.config().opponent_delay());
        }
        update
    }

    pub fn select(&mut self, coord: Coord) -> Update {
        let update = self.session.select(coord);
        self.dispatch(update)
    }

    pub fn resign(&mut self) -> Update {
        self.timer.cancel();
        let update = self.session.resign();
        self.dispatch(update)
    }

    /// Starts a new game, reseeding the opponent if `config` has a seed
    pub fn new_game(&mut self, config: GameConfig) -> Update {
        self.timer.cancel();
        if config.seed.is_some() {
            self.rng = make_rng(&config);
        }
        let update = self.session.new_game(config);
        self.dispatch(update)
    }

    fn play(&mut self, ticket: OpponentTicket) -> Update {
        let update = self.session.play_opponent(ticket, &mut self.rng);
        self.dispatch(update)
    }

    /// Waits at most `timeout` for the opponent's move and applies it
    ///
    /// Returns `None` if no move was delivered in time.
    pub fn wait_opponent(&mut self, timeout: Duration) -> Option<Update> {
        let ticket = self.timer.recv_timeout(timeout)?;
        Some(self.play(ticket))
    }

    /// Applies the opponent's move if its delay has already expired
    pub fn poll(&mut self) -> Option<Update> {
        let ticket = self.timer.try_recv()?;
        Some(self.play(ticket))
    }
}
