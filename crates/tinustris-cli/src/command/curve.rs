use tinustris_engine::{Behavior, GameState, SpeedCurve};

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct CurveArg {
    /// Rule preset to describe
    #[arg(long, default_value_t)]
    behavior: Behavior,
    /// First level to print
    #[arg(long, default_value_t = 0)]
    from: u32,
    /// Last level to print
    #[arg(long, default_value_t = 999)]
    to: u32,
    /// Print every level, not only those where a value changes
    #[arg(long)]
    all: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Timings {
    gravity: u32,
    lock_delay: u32,
    are: u32,
    line_clear_delay: u32,
}

impl Timings {
    fn at_level(curve: &dyn SpeedCurve, level: u32) -> Self {
        let state = GameState::builder().level(level).build();
        Self {
            gravity: curve.internal_gravity(&state),
            lock_delay: curve.lock_delay(&state),
            are: curve.are(&state),
            line_clear_delay: curve.line_clear_delay(&state),
        }
    }
}

pub(crate) fn run(arg: &CurveArg) -> anyhow::Result<()> {
    let CurveArg {
        behavior,
        from,
        to,
        all,
    } = arg;
    anyhow::ensure!(from <= to, "--from {from} is above --to {to}");

    let curve = behavior.speed_curve();
    eprintln!("{}", behavior.name());
    println!(
        "{:>5} {:>8} {:>5} {:>4} {:>10}",
        "level", "gravity", "lock", "are", "line clear"
    );

    let mut last = None;
    for level in *from..=*to {
        let timings = Timings::at_level(curve.as_ref(), level);
        if *all || last != Some(timings) {
            let Timings {
                gravity,
                lock_delay,
                are,
                line_clear_delay,
            } = timings;
            println!("{level:>5} {gravity:>8} {lock_delay:>5} {are:>4} {line_clear_delay:>10}");
        }
        last = Some(timings);
    }

    Ok(())
}
