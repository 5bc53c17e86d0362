//! Page Curl demo entry point
//!
//! Headless replay: drives a book through a few scripted page turns with a
//! fixed-step loop and logs what the renderer would receive.
//!
//! Usage: `page-curl [seed] [settings.json]`

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use glam::Vec2;
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg32;

    use page_curl::FlipSettings;
    use page_curl::curl::FlipDirection;
    use page_curl::flip::{FlipEvent, FlipInput, FlipSession, PageContent, tick};

    /// Render loop rate; the session's snap step is independent of it
    const FRAME_DT: f32 = 1.0 / 60.0;
    /// Maximum ticks per scripted turn before giving up
    const MAX_TICKS: u32 = 600;

    /// Demo instance holding the session and its input script
    pub struct Demo {
        session: FlipSession,
        rng: Pcg32,
        ticks: u64,
        events: Vec<FlipEvent>,
    }

    impl Demo {
        pub fn new(seed: u64, settings: FlipSettings) -> Result<Self, Box<dyn std::error::Error>> {
            let pages = PageContent::new((0..10).map(|i| format!("page_{:02}", i)), "cover");
            let session = FlipSession::new(800.0, 600.0, pages)?.with_settings(settings)?;
            Ok(Self {
                session,
                rng: Pcg32::seed_from_u64(seed),
                ticks: 0,
                events: Vec::new(),
            })
        }

        pub fn session(&self) -> &FlipSession {
            &self.session
        }

        fn step(&mut self, input: &FlipInput) {
            let frame = tick(&mut self.session, input, FRAME_DT);
            self.ticks += 1;
            if let Some(t) = frame.transforms {
                log::trace!(
                    "tick {}: page at {} rot {:.2}, mask at {} rot {:.2}",
                    self.ticks,
                    t.current_page.position,
                    t.current_page.rotation_deg,
                    t.clip_mask.position,
                    t.clip_mask.rotation_deg
                );
            }
            for event in frame.events {
                log::info!("tick {}: {:?}", self.ticks, event);
                self.events.push(event);
            }
        }

        fn settle(&mut self) {
            for _ in 0..MAX_TICKS {
                if !self.session.is_animating() {
                    return;
                }
                self.step(&FlipInput::default());
            }
            log::warn!("Turn still animating after {} ticks", MAX_TICKS);
        }

        /// Press near a corner, wander toward `to` with jitter, let go
        pub fn drag(&mut self, direction: FlipDirection, to: Vec2, samples: u32) {
            let corner = direction.corner(self.session.constants());
            let start = corner + Vec2::new(-corner.x.signum() * 5.0, 5.0);
            self.step(&FlipInput {
                press: Some((direction, start)),
                ..Default::default()
            });

            for i in 1..=samples {
                let t = i as f32 / samples as f32;
                let jitter = Vec2::new(
                    self.rng.random_range(-6.0..6.0),
                    self.rng.random_range(-6.0..6.0),
                );
                self.step(&FlipInput {
                    pointer: Some(start.lerp(to, t) + jitter),
                    ..Default::default()
                });
            }

            self.step(&FlipInput {
                release: true,
                ..Default::default()
            });
            self.settle();
        }

        pub fn auto_flip(&mut self, direction: FlipDirection) {
            self.step(&FlipInput {
                auto_flip: Some(direction),
                ..Default::default()
            });
            self.settle();
        }

        pub fn events(&self) -> &[FlipEvent] {
            &self.events
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use glam::Vec2;
    use page_curl::FlipSettings;
    use page_curl::curl::FlipDirection;

    env_logger::init();
    log::info!("Page Curl (native) starting...");

    let mut args = std::env::args().skip(1);
    let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or(12345);
    let settings = match args.next() {
        Some(path) => match std::fs::read_to_string(&path)
            .map_err(|e| e.to_string())
            .and_then(|json| FlipSettings::from_json(&json).map_err(|e| e.to_string()))
        {
            Ok(settings) => settings,
            Err(e) => {
                log::error!("Could not load settings from {}: {}", path, e);
                std::process::exit(1);
            }
        },
        None => FlipSettings::default(),
    };

    let mut demo = match demo::Demo::new(seed, settings) {
        Ok(demo) => demo,
        Err(e) => {
            log::error!("Could not create book: {}", e);
            std::process::exit(1);
        }
    };
    log::info!("Book ready with seed {}", seed);

    // Two completed turns forward, one that falls back, one back by hand,
    // then a programmatic turn.
    demo.drag(FlipDirection::RightToLeft, Vec2::new(-320.0, -220.0), 40);
    demo.drag(FlipDirection::RightToLeft, Vec2::new(-300.0, -150.0), 30);
    demo.drag(FlipDirection::RightToLeft, Vec2::new(250.0, -260.0), 20);
    demo.drag(FlipDirection::LeftToRight, Vec2::new(330.0, -200.0), 40);
    demo.auto_flip(FlipDirection::RightToLeft);

    println!("{} events:", demo.events().len());
    for event in demo.events() {
        println!("  {:?}", event);
    }
    match serde_json::to_string_pretty(demo.session()) {
        Ok(json) => println!("{}", json),
        Err(e) => log::error!("Could not serialize session: {}", e),
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Library-only on wasm32; embed `page_curl::flip::FlipSession` in the host app
}
