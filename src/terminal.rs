// terminal plumbing: raw input through termios, a reader thread for stdin and
// the escape sequences used to draw and to receive mouse clicks
use std::io::{self, Read, Write};
use std::sync::mpsc::{self, Receiver};
use std::thread;

use termios::{tcsetattr, Termios, ECHO, ICANON, ISIG, TCSANOW};

use crate::error::Result;

const STDIN_FD: i32 = 0;

const ENTER_SCREEN: &str = "\x1b[?1049h\x1b[?25l\x1b[?1000h\x1b[?1006h";
const LEAVE_SCREEN: &str = "\x1b[?1006l\x1b[?1000l\x1b[?25h\x1b[?1049l";

pub fn clear_screen() -> String {
    format!("{}[2J{}[1;1H", 27 as char, 27 as char)
}

/// Keeps stdin unbuffered and silent while alive, with mouse reporting on.
/// Dropping it puts the terminal back the way it was.
pub struct RawTerminal {
    old_termios: Termios,
}

impl RawTerminal {
    pub fn enter() -> Result<Self> {
        let old_termios = Termios::from_fd(STDIN_FD)?;
        let mut new_termios = old_termios; // copy the termios struct
        // no echo, no line buffering, and ctrl-c arrives as a byte
        new_termios.c_lflag &= !(ICANON | ECHO | ISIG);
        tcsetattr(STDIN_FD, TCSANOW, &new_termios)?;
        let terminal = RawTerminal { old_termios };
        let mut stdout = io::stdout();
        stdout.write_all(ENTER_SCREEN.as_bytes())?;
        stdout.flush()?;
        Ok(terminal)
    }
}

impl Drop for RawTerminal {
    fn drop(&mut self) {
        let mut stdout = io::stdout();
        let _ = stdout.write_all(LEAVE_SCREEN.as_bytes());
        let _ = stdout.flush();
        let _ = tcsetattr(STDIN_FD, TCSANOW, &self.old_termios);
    }
}

/// Reads stdin one byte at a time on its own thread. The channel disconnects
/// once stdin closes or fails.
pub fn spawn_stdin_channel() -> Receiver<u8> {
    let (tx, rx) = mpsc::channel::<u8>();
    thread::spawn(move || {
        let mut reader = io::stdin();
        let mut buffer: [u8; 1] = [0; 1];
        while reader.read_exact(&mut buffer).is_ok() {
            if tx.send(buffer[0]).is_err() {
                break;
            }
        }
    });
    rx
}

pub fn present(frame: &str) -> Result<()> {
    let mut stdout = io::stdout().lock();
    stdout.write_all(clear_screen().as_bytes())?;
    stdout.write_all(frame.as_bytes())?;
    stdout.flush()?;
    Ok(())
}
