//! Demo harness: builds a synthetic scene, runs the engine end to end with
//! the `reference` collaborators, and reports the statistics a caller would
//! log or persist.

mod config;

use clap::Parser;
use config::CliArgs;
use fmask_core::engine;
use fmask_core::image::ImageDescriptor;
use fmask_core::mask::{conf, pixel};
use fmask_core::reference::{InMemorySource, ReferenceFloodFill, ReferencePercentile};

/// Minimal xorshift64* generator — good enough to vary a demo scene
/// deterministically from a seed, not intended for statistical quality.
struct Xorshift64(u64);

impl Xorshift64 {
    fn new(seed: u64) -> Self {
        Self(seed.max(1))
    }

    fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x.wrapping_mul(0x2545_f491_4f6c_dd1d)
    }

    fn range(&mut self, lo: i16, hi: i16) -> i16 {
        let span = (hi - lo) as u64 + 1;
        lo + (self.next_u64() % span) as i16
    }
}

fn synthetic_scene(rows: usize, cols: usize, seed: u64) -> (ImageDescriptor, InMemorySource) {
    let desc = ImageDescriptor {
        rows,
        cols,
        bands: 6,
        satu_value_ref: vec![20000; 6],
        satu_value_max: vec![10000; 6],
        therm_satu_value_ref: -9999,
        therm_satu_value_max: -273,
    };

    let mut rng = Xorshift64::new(seed);
    let mut reflective: [Vec<i16>; 6] = Default::default();
    for band in reflective.iter_mut() {
        *band = vec![0i16; rows * cols];
    }
    let mut thermal = vec![0i16; rows * cols];

    for idx in 0..rows * cols {
        // Mostly clear vegetated land, with a sprinkling of bright cloud.
        let is_cloud_candidate = idx % 11 == 0;
        if is_cloud_candidate {
            for band in reflective.iter_mut() {
                band[idx] = 9800;
            }
            thermal[idx] = rng.range(1800, 2200);
        } else {
            reflective[0][idx] = rng.range(300, 600);
            reflective[1][idx] = rng.range(400, 700);
            reflective[2][idx] = rng.range(500, 800);
            reflective[3][idx] = rng.range(2500, 3500);
            reflective[4][idx] = rng.range(1200, 1800);
            reflective[5][idx] = rng.range(600, 1000);
            thermal[idx] = rng.range(2300, 2700);
        }
    }

    (desc, InMemorySource::new(rows, cols, reflective, thermal))
}

fn histogram(pixel_mask: &[u8], conf_mask: &[u8]) -> String {
    let mut fill = 0u64;
    let mut cloud = 0u64;
    let mut shadow = 0u64;
    let mut snow = 0u64;
    let mut water = 0u64;
    let mut high = 0u64;
    let mut med = 0u64;
    let mut low = 0u64;

    for (&pm, &cm) in pixel_mask.iter().zip(conf_mask.iter()) {
        if pm & pixel::FILL != 0 {
            fill += 1;
            continue;
        }
        if pm & pixel::CLOUD != 0 {
            cloud += 1;
        }
        if pm & pixel::SHADOW != 0 {
            shadow += 1;
        }
        if pm & pixel::SNOW != 0 {
            snow += 1;
        }
        if pm & pixel::WATER != 0 {
            water += 1;
        }
        match cm {
            conf::HIGH => high += 1,
            conf::MED => med += 1,
            conf::LOW => low += 1,
            _ => {}
        }
    }

    format!(
        "fill={fill} cloud={cloud} shadow={shadow} snow={snow} water={water} conf_high={high} conf_med={med} conf_low={low}"
    )
}

fn main() {
    let args = CliArgs::parse();
    if args.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::init();
    }
    log::info!("starting demo run: rows={} cols={} seed={}", args.rows, args.cols, args.seed);

    let (desc, mut source) = synthetic_scene(args.rows, args.cols, args.seed);
    let percentile = ReferencePercentile;
    let floodfill = ReferenceFloodFill;
    let mut pixel_mask = vec![0u8; desc.pixel_count()];
    let mut conf_mask = vec![conf::NONE; desc.pixel_count()];

    match engine::run(
        &desc,
        &mut source,
        &percentile,
        &floodfill,
        args.cloud_prob_threshold,
        &mut pixel_mask,
        &mut conf_mask,
        args.verbose,
    ) {
        Ok(summary) => {
            println!("clear_ptm={:.3}", summary.clear_ptm);
            println!("t_templ={:.1}", summary.t_templ);
            println!("t_temph={:.1}", summary.t_temph);
            println!("all_cloud_shortcut={}", summary.all_cloud_shortcut);
            println!("{}", histogram(&pixel_mask, &conf_mask));
        }
        Err(err) => {
            eprintln!("run failed: {err}");
            std::process::exit(1);
        }
    }
}
