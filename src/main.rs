use overtrack::backend::{CvTrackerFactory, VideoGrabber, Window};
use overtrack::config::Config;
use overtrack::error::Error;
use overtrack::recorder::TrackRecorder;
use overtrack::{Compositor, FrameSource, MultiTracker, OverlayImage, Playback, Session};

use log::{error, info};

const WINDOW_NAME: &str = "overtrack";

fn run() -> Result<(), Error> {
    let config = Config::from_args(std::env::args_os())?;
    log::debug!("config: {}", serde_json::to_string(&config)?);

    let mut grabber = VideoGrabber::open(&config.source)?;
    grabber.set_max_size(config.max_size.0, config.max_size.1);

    info!(
        "algorithm {} chosen (reports size: {})",
        config.descriptor.algorithm, config.descriptor.reports_size
    );

    let overlays = config
        .overlays
        .iter()
        .map(OverlayImage::open)
        .collect::<Result<Vec<_>, _>>()?;

    let tracker = MultiTracker::new(CvTrackerFactory, config.descriptor, config.init_policy);
    let playback = Playback::new(!config.start_paused);

    let mut session = Session::new(grabber, tracker, Compositor::new(overlays), playback)?;
    if let Some(path) = &config.dump_tracks {
        session = session.with_recorder(TrackRecorder::create(path)?);
    }

    let mut window = Window::open(WINDOW_NAME, session.frame(), (0, 0))?;
    session.run(&mut window)?;
    window.close()?;

    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let code = match run() {
        Ok(()) => 0,
        Err(Error::Usage(err)) => {
            // --help and --version end up here as well
            if !err.use_stderr() {
                err.exit();
            }

            let _ = err.print();
            2
        }
        Err(err) => {
            error!("{}", err);
            err.exit_code()
        }
    };

    std::process::exit(code);
}
