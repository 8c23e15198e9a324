// Copyright (C) 2023, Alex Badics
// This file is part of hmd-orientation
// Licensed under the MIT license. See LICENSE file in the project root for details.

//! Console used by the session. See [`Terminal`] and [`StdTerminal`]

use std::{
    io::{self, BufRead, Read, Stdout, Write},
    sync::mpsc::{self, Receiver, TryRecvError},
    thread,
    time::Duration,
};

/// Output, blocking confirmation, and keypress polling of a console
pub trait Terminal: Write {
    /// Block until the user presses ENTER
    fn wait_for_enter(&mut self) -> io::Result<()>;

    /// `true` if a key was pressed since the last call. Never blocks.
    fn key_pressed(&mut self) -> bool;

    /// Throttle the caller
    fn sleep(&mut self, duration: Duration) {
        thread::sleep(duration);
    }
}

/// [`Terminal`] on the process' stdin and stdout.
///
/// Keypresses are read by a helper thread, started on the first [`Terminal::key_pressed`]
/// call so that it does not steal the line of [`Terminal::wait_for_enter`].
/// A line buffered console only delivers the key after ENTER.
pub struct StdTerminal {
    stdout: Stdout,
    keys: Option<Receiver<()>>,
}

impl StdTerminal {
    /// Terminal on stdin/stdout
    pub fn new() -> Self {
        Self {
            stdout: io::stdout(),
            keys: None,
        }
    }

    fn spawn_key_reader() -> Receiver<()> {
        let (sender, receiver) = mpsc::channel();
        thread::spawn(move || {
            for byte in io::stdin().lock().bytes() {
                if byte.is_err() || sender.send(()).is_err() {
                    break;
                }
            }
            log::debug!("stdin closed, key reader exiting");
        });
        receiver
    }
}

impl Default for StdTerminal {
    fn default() -> Self {
        Self::new()
    }
}

impl Write for StdTerminal {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.stdout.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.stdout.flush()
    }
}

impl Terminal for StdTerminal {
    fn wait_for_enter(&mut self) -> io::Result<()> {
        self.stdout.flush()?;
        let mut line = String::new();
        io::stdin().lock().read_line(&mut line)?;
        Ok(())
    }

    fn key_pressed(&mut self) -> bool {
        let keys = self.keys.get_or_insert_with(Self::spawn_key_reader);
        drain_keys(keys)
    }
}

/// `true` if anything arrived on `keys`. Consumes everything queued, so a single
/// line counts as a single press. A disconnected reader counts as pressed: nothing
/// more will ever come from a closed stdin.
fn drain_keys(keys: &Receiver<()>) -> bool {
    let mut pressed = false;
    loop {
        match keys.try_recv() {
            Ok(()) => pressed = true,
            Err(TryRecvError::Empty) => return pressed,
            Err(TryRecvError::Disconnected) => return true,
        }
    }
}
