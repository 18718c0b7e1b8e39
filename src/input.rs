// raw stdin bytes are queued here and decoded into game inputs.
// mouse clicks arrive as SGR reports: ESC [ < button ; col ; row M
use circular_buffer::CircularBuffer;

pub type InputBuffer = CircularBuffer<1024, u8>; // 1024 bytes in input buffer

const ESC: u8 = 27;
const CTRL_C: u8 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// keyboard shortcut for the roll control
    Roll,
    /// left click at a 1-based terminal cell
    Click { col: u16, row: u16 },
    Quit,
}

#[derive(Debug)]
pub struct InputDecoder {
    buffer: InputBuffer,
}

impl Default for InputDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl InputDecoder {
    pub fn new() -> Self {
        InputDecoder {
            buffer: InputBuffer::new(),
        }
    }

    pub fn push(&mut self, key: u8) {
        // if the buffer is full, ignore the input
        if self.buffer.is_full() {
            return;
        }
        self.buffer.push_back(key);
    }

    pub fn pending(&self) -> usize {
        self.buffer.len()
    }

    /// Decodes the next complete input. Incomplete escape sequences stay
    /// buffered until the rest arrives.
    pub fn next_event(&mut self) -> Option<InputEvent> {
        loop {
            let first = *self.buffer.front()?;
            match first {
                ESC => {
                    let second = *self.buffer.nth_front(1)?;
                    if second != b'[' {
                        // not a control sequence, drop the escape
                        self.buffer.pop_front();
                        continue;
                    }
                    let end = match (2..self.buffer.len()).find(|&i| {
                        self.buffer.nth_front(i).is_some_and(|b| is_final_byte(*b))
                    }) {
                        Some(end) => end,
                        None => {
                            // a sequence that can never finish would block the buffer
                            if self.buffer.is_full() {
                                self.buffer.clear();
                            }
                            return None;
                        }
                    };
                    let sequence: Vec<u8> =
                        (0..=end).filter_map(|_| self.buffer.pop_front()).collect();
                    if let Some(event) = parse_control_sequence(&sequence[2..]) {
                        return Some(event);
                    }
                }
                b'r' | b'R' | b' ' | b'\n' | b'\r' => {
                    self.buffer.pop_front();
                    return Some(InputEvent::Roll);
                }
                b'q' | b'Q' | CTRL_C => {
                    self.buffer.pop_front();
                    return Some(InputEvent::Quit);
                }
                _ => {
                    self.buffer.pop_front();
                }
            }
        }
    }
}

fn is_final_byte(byte: u8) -> bool {
    (0x40..=0x7e).contains(&byte)
}

// body is everything after "ESC [", final byte included.
// arrow keys and other sequences decode to nothing
fn parse_control_sequence(body: &[u8]) -> Option<InputEvent> {
    let (&last, rest) = body.split_last()?;
    let params = rest.strip_prefix(b"<")?;
    if last != b'M' {
        // button release
        return None;
    }
    let text = std::str::from_utf8(params).ok()?;
    let mut fields = text.split(';').map(|field| field.parse::<u16>().ok());
    let button = fields.next()??;
    let col = fields.next()??;
    let row = fields.next()??;
    if fields.next().is_some() {
        return None;
    }
    // low bits pick the button, 32 is motion and 64 the wheel
    if button & 0b11 != 0 || button & (32 | 64) != 0 {
        return None;
    }
    Some(InputEvent::Click { col, row })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(bytes: &[u8]) -> Vec<InputEvent> {
        let mut decoder = InputDecoder::new();
        bytes.iter().for_each(|b| decoder.push(*b));
        std::iter::from_fn(|| decoder.next_event()).collect()
    }

    #[test]
    fn roll_and_quit_keys() {
        assert_eq!(
            decode(b"xr q\x03"),
            vec![
                InputEvent::Roll,
                InputEvent::Roll,
                InputEvent::Quit,
                InputEvent::Quit
            ]
        );
    }

    #[test]
    fn left_click_press() {
        assert_eq!(
            decode(b"\x1b[<0;12;7M\x1b[<0;12;7m"),
            vec![InputEvent::Click { col: 12, row: 7 }]
        );
    }

    #[test]
    fn other_buttons_and_arrows_are_ignored() {
        assert_eq!(decode(b"\x1b[<2;1;1M\x1b[<64;3;3M\x1b[A\x1b[<32;5;5M"), vec![]);
    }

    #[test]
    fn partial_sequence_waits_for_the_rest() {
        let mut decoder = InputDecoder::new();
        b"\x1b[<0;4".iter().for_each(|b| decoder.push(*b));
        assert_eq!(decoder.next_event(), None);
        assert_eq!(decoder.pending(), 6);
        b";9M".iter().for_each(|b| decoder.push(*b));
        assert_eq!(decoder.next_event(), Some(InputEvent::Click { col: 4, row: 9 }));
        assert_eq!(decoder.pending(), 0);
    }

    #[test]
    fn lone_escape_before_a_key_is_dropped() {
        assert_eq!(decode(b"\x1br"), vec![InputEvent::Roll]);
    }
}
