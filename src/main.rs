use std::io::Write;

use telem::{
    FrameDecoder, FrameLayout, SampleFormatter, SessionConfig, StreamSource, TextFormatter,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().collect();

    if args.len() != 2 {
        eprintln!(
            "Usage: {} <device-or-capture-path>",
            args.first().map_or("telem", |s| s.as_str())
        );
        return Err("Invalid arguments".into());
    }

    let config = SessionConfig::default();
    let layout = FrameLayout::for_format(config.format);
    let source = StreamSource::open(&args[1])?;
    let mut decoder = FrameDecoder::new(source, layout)
        .with_code_tables(config.fault_codes.clone(), config.state_codes.clone());
    let formatter = TextFormatter::default();

    let mut stdout = std::io::stdout();
    let mut blink = '.';
    for sample in decoder.by_ref() {
        write!(stdout, "{} {}\r", blink, formatter.format_sample(&sample))?;
        stdout.flush()?;
        blink = if blink == '.' { ' ' } else { '.' };
    }
    writeln!(stdout)?;

    if let Some(reason) = decoder.stop_reason() {
        eprintln!("stream ended: {}", reason);
    }

    Ok(())
}
