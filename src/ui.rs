use std::fmt::Write as _;
use std::io::{self, Write};

use timer_core::{format_time_parts, Stopwatch, TimeParts};

const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

pub const HELP_TEXT: &str = "STOPWATCH HELP\n\n\
     Enter  Start/Pause/Resume\n\
     l      Record lap\n\
     r      Reset\n\
     h ?    Help\n\
     q      Quit\n\n\
     Type a key and press Enter.";

pub fn render_stopwatch(timer: &Stopwatch) -> String {
    let mut frame = String::new();
    let [hour, min, sec, centi] = format_time_parts(timer.elapsed_ms());

    frame.push_str("WebWatch\n");
    frame.push_str("Online Stopwatch\n\n");
    let _ = writeln!(frame, "    {} : {} : {} : {}\n", hour, min, sec, centi);

    let lap_label = if timer.lap_enabled() { "Lap" } else { "Lap (disabled)" };
    let _ = writeln!(
        frame,
        "  [Enter] {}   [r] Reset   [l] {}\n",
        timer.control_label(),
        lap_label
    );

    frame.push_str("Laps\n");
    if timer.laps().is_empty() {
        frame.push_str("  No laps recorded.\n");
    } else {
        let splits = timer.splits();
        for ((number, ms), split) in timer.numbered_laps().zip(splits) {
            let _ = writeln!(
                frame,
                "  Lap {:<3} {}   +{}",
                number,
                TimeParts::from_ms(ms),
                TimeParts::from_ms(split)
            );
        }
    }

    frame
}

pub fn draw_stopwatch(out: &mut impl Write, timer: &Stopwatch, plain: bool) -> io::Result<()> {
    draw(out, &render_stopwatch(timer), plain)
}

pub fn draw_help(out: &mut impl Write, plain: bool) -> io::Result<()> {
    draw(out, HELP_TEXT, plain)
}

fn draw(out: &mut impl Write, frame: &str, plain: bool) -> io::Result<()> {
    if !plain {
        out.write_all(CLEAR_SCREEN.as_bytes())?;
    }
    out.write_all(frame.as_bytes())?;
    if plain {
        out.write_all(b"\n")?;
    }
    out.flush()
}
