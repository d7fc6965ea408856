mod renderer;

use std::{
    io::{Stdout, Write},
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
        mpsc::{Receiver, RecvTimeoutError, Sender, channel},
    },
    thread::ThreadId,
    time::Duration,
};

use crossterm::{
    cursor,
    event::{self, KeyCode, KeyEvent},
    queue,
    terminal::{self, ClearType},
};

pub use renderer::{Renderer, session_label, solver_color};

use crate::{
    controller::{ProgressEvent, RunController},
    solvers::Solver,
};

enum UserInputEvent {
    KeyPress(KeyEvent),
    Resize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum UserAction {
    /// Run one algorithm on the current maze
    Start(Solver),
    /// Replace the maze with a fresh one
    Generate,
    /// Wipe paths, visited cells and statistics
    Clear,
    Quit,
}

impl UserAction {
    fn from_key(key: KeyEvent) -> Option<UserAction> {
        let action = match key.code {
            KeyCode::Char('1') | KeyCode::Char('b') => UserAction::Start(Solver::Bfs),
            KeyCode::Char('2') | KeyCode::Char('d') => UserAction::Start(Solver::Dfs),
            KeyCode::Char('3') | KeyCode::Char('j') => UserAction::Start(Solver::Dijkstra),
            KeyCode::Char('4') | KeyCode::Char('a') => UserAction::Start(Solver::AStar),
            KeyCode::Char('g') => UserAction::Generate,
            KeyCode::Char('c') => UserAction::Clear,
            KeyCode::Esc | KeyCode::Char('q') => UserAction::Quit,
            _ => return None,
        };
        Some(action)
    }
}

pub struct App {
    controller: RunController,
    /// How long the main loop waits for input before redrawing pending progress
    input_recv_timeout: Duration,
    /// How often the input thread checks whether it should stop
    user_input_event_poll_timeout: Duration,
}

impl App {
    pub fn new(controller: RunController) -> Self {
        Self {
            controller,
            input_recv_timeout: Duration::from_millis(16),
            user_input_event_poll_timeout: Duration::from_millis(100),
        }
    }

    /// Set a panic hook to restore terminal state when the UI thread panics.
    /// Run threads recover on their own and the shell keeps going, so a panic
    /// there must leave the terminal alone.
    fn set_panic_hook() {
        let ui_thread = std::thread::current().id();
        let hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |panic_info| {
            if App::owns_terminal(ui_thread) {
                let _ = App::restore_terminal(&mut std::io::stdout());
            }
            hook(panic_info);
        }));
    }

    fn owns_terminal(ui_thread: ThreadId) -> bool {
        std::thread::current().id() == ui_thread
    }

    /// Setup terminal in raw mode and enter alternate screen
    pub fn setup_terminal(stdout: &mut Stdout) -> std::io::Result<()> {
        terminal::enable_raw_mode()?;
        App::set_panic_hook();
        queue!(
            stdout,
            terminal::EnterAlternateScreen,
            terminal::Clear(ClearType::All),
            cursor::Hide,
            cursor::MoveTo(0, 0)
        )?;
        stdout.flush()?;
        Ok(())
    }

    /// Leave alternate screen and disable raw mode
    pub fn restore_terminal(stdout: &mut Stdout) -> std::io::Result<()> {
        queue!(stdout, terminal::LeaveAlternateScreen, cursor::Show)?;
        stdout.flush()?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    fn listen_to_user_input(
        user_input_event_tx: Sender<UserInputEvent>,
        event_poll_timeout: Duration,
        should_stop: &AtomicBool,
    ) -> std::io::Result<()> {
        loop {
            if should_stop.load(Ordering::Relaxed) {
                return Ok(());
            }
            if !event::poll(event_poll_timeout)? {
                continue;
            }
            let input_event = match event::read()? {
                event::Event::Key(key_event) if key_event.kind == event::KeyEventKind::Press => {
                    UserInputEvent::KeyPress(key_event)
                }
                event::Event::Resize(_, _) => UserInputEvent::Resize,
                _ => continue,
            };
            if user_input_event_tx.send(input_event).is_err() {
                // Main loop is gone
                return Ok(());
            }
        }
    }

    /// Forward an action to the controller. Returns false on quit.
    fn dispatch(&self, action: UserAction) -> bool {
        match action {
            UserAction::Start(solver) => {
                self.controller.start(solver);
            }
            UserAction::Generate => {
                self.controller.generate();
            }
            UserAction::Clear => {
                self.controller.clear();
            }
            UserAction::Quit => return false,
        }
        true
    }

    /// Redraw on input and on progress until the user quits.
    fn event_loop(
        &self,
        input_rx: &Receiver<UserInputEvent>,
        progress_rx: &Receiver<ProgressEvent>,
    ) -> std::io::Result<()> {
        let mut renderer = Renderer::new(session_label(self.controller.config()));
        renderer.clear()?;
        renderer.draw(&self.controller.snapshot())?;

        loop {
            let mut dirty = false;
            match input_rx.recv_timeout(self.input_recv_timeout) {
                Ok(UserInputEvent::KeyPress(key)) => {
                    if let Some(action) = UserAction::from_key(key) {
                        tracing::debug!(?action, "user action");
                        if !self.dispatch(action) {
                            return Ok(());
                        }
                    }
                }
                Ok(UserInputEvent::Resize) => {
                    renderer.clear()?;
                    dirty = true;
                }
                Err(RecvTimeoutError::Timeout) => {}
                // Input thread died, most likely on a terminal error
                Err(RecvTimeoutError::Disconnected) => return Ok(()),
            }

            // Coalesce everything that happened since the last frame
            if progress_rx.try_iter().count() > 0 {
                dirty = true;
            }
            if dirty {
                renderer.draw(&self.controller.snapshot())?;
            }
        }
    }

    /// Main application loop. Returns when the user quits.
    pub fn run(&self) -> std::io::Result<()> {
        let progress_rx = self.controller.subscribe();
        let (input_tx, input_rx) = channel();
        let should_stop = Arc::new(AtomicBool::new(false));

        let input_handle = {
            let should_stop = Arc::clone(&should_stop);
            let poll_timeout = self.user_input_event_poll_timeout;
            std::thread::spawn(move || {
                App::listen_to_user_input(input_tx, poll_timeout, &should_stop)
            })
        };

        let result = self.event_loop(&input_rx, &progress_rx);

        should_stop.store(true, Ordering::Relaxed);
        match input_handle.join() {
            Ok(Err(e)) => tracing::warn!(error = %e, "input thread failed"),
            Err(_) => tracing::error!("input thread panicked"),
            Ok(Ok(())) => {}
        }
        result
    }
}
