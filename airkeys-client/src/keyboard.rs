use airkeys_shared::{KeyboardSettings, Point};
use anyhow::{bail, Result};

const BLACK_KEY_WIDTH_RATIO: f64 = 0.5;
const BLACK_KEY_HEIGHT_RATIO: f64 = 0.6;
const WHITE_NOTES: [char; 7] = ['C', 'D', 'E', 'F', 'G', 'A', 'B'];
const FIRST_OCTAVE: i32 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyKind {
    White,
    Black,
}

/// One key of the bed: its rectangle in output-window coordinates and its
/// note name (e.g. "C4", "F#5").
#[derive(Debug, Clone)]
pub struct Key {
    pub kind: KeyKind,
    pub note: String,
    x: f64,
    y: f64,
    width: f64,
    height: f64,
}

impl Key {
    fn contains(&self, point: Point) -> bool {
        let (px, py) = (point.x as f64, point.y as f64);
        px >= self.x && px < self.x + self.width && py >= self.y && py < self.y + self.height
    }
}

/// A row-major bed of white keys with interleaved black keys, hit-tested
/// with press points in output-window coordinates. Black keys sit on top
/// of the white row and win the hit test. There is no sharp after E or B,
/// nor after the last key of a row.
pub struct KeyBed {
    keys: Vec<Key>,
}

impl KeyBed {
    /// Lays out the bed inside a `width` x `height` window. The row count
    /// must divide the white-key count; this is checked once here, never
    /// per frame.
    pub fn new(width: i32, height: i32, settings: &KeyboardSettings) -> Result<Self> {
        if settings.rows == 0
            || settings.white_keys == 0
            || settings.white_keys % settings.rows != 0
        {
            bail!(
                "number of rows ({}) must be a factor of the number of white keys ({})",
                settings.rows,
                settings.white_keys
            );
        }

        let keys_per_row = settings.white_keys / settings.rows;
        let white_height = height as f64 / settings.rows as f64 - settings.row_margin as f64;
        let white_width = width as f64 / keys_per_row as f64;
        if white_height <= 0.0 {
            bail!("row margin leaves no room for keys");
        }

        let mut keys = Vec::with_capacity(settings.white_keys * 2);
        let mut letter_index = 0usize;
        let mut octave = FIRST_OCTAVE;
        for row in 0..settings.rows {
            let row_top = row as f64 * (white_height + settings.row_margin as f64);
            for column in 0..keys_per_row {
                let x = column as f64 * white_width;
                let letter = WHITE_NOTES[letter_index];
                keys.push(Key {
                    kind: KeyKind::White,
                    note: format!("{letter}{octave}"),
                    x,
                    y: row_top,
                    width: white_width,
                    height: white_height,
                });
                if letter != 'E' && letter != 'B' && column != keys_per_row - 1 {
                    keys.push(Key {
                        kind: KeyKind::Black,
                        note: format!("{letter}#{octave}"),
                        x: x + 0.75 * white_width,
                        y: row_top,
                        width: BLACK_KEY_WIDTH_RATIO * white_width,
                        height: BLACK_KEY_HEIGHT_RATIO * white_height,
                    });
                }
                letter_index += 1;
                if letter_index == WHITE_NOTES.len() {
                    letter_index = 0;
                    octave += 1;
                }
            }
        }
        Ok(Self { keys })
    }

    pub fn keys(&self) -> &[Key] {
        &self.keys
    }

    /// The key under `point`, black keys first since they overlay the row.
    pub fn key_at(&self, point: Point) -> Option<usize> {
        self.keys
            .iter()
            .position(|k| k.kind == KeyKind::Black && k.contains(point))
            .or_else(|| {
                self.keys
                    .iter()
                    .position(|k| k.kind == KeyKind::White && k.contains(point))
            })
    }

    pub fn note_at(&self, point: Point) -> Option<&str> {
        self.key_at(point).map(|i| self.keys[i].note.as_str())
    }

    /// Notes under the given press points, deduplicated, in press order.
    pub fn pressed_notes(&self, points: &[Point]) -> Vec<&str> {
        let mut notes = Vec::new();
        for &point in points {
            if let Some(note) = self.note_at(point) {
                if !notes.contains(&note) {
                    notes.push(note);
                }
            }
        }
        notes
    }
}
