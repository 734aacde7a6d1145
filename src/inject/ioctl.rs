use super::{InjectError, TerminalControl};
use libc::{self, c_int};
use std::io::{self, IsTerminal};

// Request numbers differ per OS family; only the families below are wired.
#[cfg(target_os = "linux")]
mod request {
    pub(super) use libc::{TCGETS as GET_SETTINGS, TCSETS as SET_SETTINGS, TIOCSTI as INJECT_CHAR};
}

#[cfg(target_os = "macos")]
mod request {
    pub(super) use libc::{
        TIOCGETA as GET_SETTINGS, TIOCSETA as SET_SETTINGS, TIOCSTI as INJECT_CHAR,
    };
}

/// The controlling terminal, addressed through a file descriptor.
pub struct TtyControl {
    fd: c_int,
}

impl TtyControl {
    pub fn stdin() -> Result<Self, InjectError> {
        if !io::stdin().is_terminal() {
            return Err(InjectError::NotATerminal);
        }
        Ok(Self {
            fd: libc::STDIN_FILENO,
        })
    }
}

impl TerminalControl for TtyControl {
    type Settings = libc::termios;

    fn get_settings(&mut self) -> io::Result<libc::termios> {
        let mut termios = unsafe { std::mem::zeroed::<libc::termios>() };
        let result = unsafe {
            libc::ioctl(
                self.fd,
                request::GET_SETTINGS,
                &mut termios as *mut libc::termios,
            )
        };
        if result != 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(termios)
    }

    fn set_settings(&mut self, settings: &libc::termios) -> io::Result<()> {
        let result = unsafe {
            libc::ioctl(
                self.fd,
                request::SET_SETTINGS,
                settings as *const libc::termios,
            )
        };
        if result != 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(())
    }

    fn without_echo(settings: &libc::termios) -> libc::termios {
        let mut quiet = *settings;
        quiet.c_lflag &= !libc::ECHO;
        quiet
    }

    // TIOCSTI queues one byte per call.
    fn inject_char(&mut self, ch: char) -> io::Result<()> {
        let mut buf = [0u8; 4];
        for byte in ch.encode_utf8(&mut buf).as_bytes() {
            let result = unsafe {
                libc::ioctl(
                    self.fd,
                    request::INJECT_CHAR,
                    byte as *const u8 as *const libc::c_char,
                )
            };
            if result != 0 {
                return Err(io::Error::last_os_error());
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_without_echo_clears_only_echo() {
        let mut settings = unsafe { std::mem::zeroed::<libc::termios>() };
        settings.c_lflag = libc::ECHO | libc::ICANON | libc::ISIG;

        let quiet = TtyControl::without_echo(&settings);

        assert_eq!(quiet.c_lflag & libc::ECHO, 0);
        assert_ne!(quiet.c_lflag & libc::ICANON, 0);
        assert_ne!(quiet.c_lflag & libc::ISIG, 0);
        assert_eq!(settings.c_lflag & libc::ECHO, libc::ECHO);
    }

    #[test]
    fn test_stdin_requires_a_terminal_or_reports_it() {
        match TtyControl::stdin() {
            Ok(_) => assert!(io::stdin().is_terminal()),
            Err(err) => assert!(matches!(err, InjectError::NotATerminal)),
        }
    }
}
