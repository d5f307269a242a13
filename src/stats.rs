//! Statistics collection. Enabled with `--features stats`.
//!
//! Each thread records into its own [`ThreadStats`], which is merged into the global [`Stats`]
//! when the thread exits or when [`flush_thread_stats`] is called.

use parking_lot::{Mutex, MutexGuard};
use std::{
    cell::{RefCell, RefMut},
    fmt::{self, Debug, Formatter},
    ops::Deref,
};

#[derive(Copy, Clone, Default, Debug)]
struct MinMaxTotal {
    min:   u64,
    max:   u64,
    total: u64,
}

/// A distribution of recorded sizes.
#[derive(Default)]
pub struct Size {
    min_max_total: Option<MinMaxTotal>,
    count:         u64,
}

impl Debug for Size {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Size")
            .field("count", &self.count)
            .field("min", &self.min())
            .field("max", &self.max())
            .field("total", &self.total())
            .field("avg", &self.avg())
            .finish()
    }
}

impl Size {
    pub(crate) fn record(&mut self, size: u64) {
        self.count += 1;
        if let Some(ref mut min_max_total) = &mut self.min_max_total {
            min_max_total.min = min_max_total.min.min(size);
            min_max_total.max = min_max_total.max.max(size);
            min_max_total.total += size;
        } else {
            self.min_max_total = Some(MinMaxTotal {
                min:   size,
                max:   size,
                total: size,
            });
        }
    }

    pub(crate) fn merge(&mut self, rhs: &Self) {
        self.count += rhs.count;
        self.min_max_total = match (self.min_max_total, rhs.min_max_total) {
            (Some(a), Some(b)) => Some(MinMaxTotal {
                min:   a.min.min(b.min),
                max:   a.max.max(b.max),
                total: a.total + b.total,
            }),
            (a, b) => a.or(b),
        };
    }

    /// Number of samples.
    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn min(&self) -> Option<u64> {
        self.min_max_total.map(|x| x.min)
    }

    pub fn max(&self) -> Option<u64> {
        self.min_max_total.map(|x| x.max)
    }

    /// Sum of all samples.
    pub fn total(&self) -> u64 {
        self.min_max_total.unwrap_or_default().total
    }

    pub fn avg(&self) -> Option<f64> {
        self.min_max_total
            .map(|x| x.total as f64 / self.count as f64)
    }
}

/// A counted event.
#[derive(Default, Debug)]
pub struct Event {
    count: u64,
}

impl Event {
    fn happened(&mut self) {
        self.count += 1
    }

    fn merge(&mut self, rhs: &Self) {
        self.count += rhs.count
    }

    pub fn count(&self) -> u64 {
        self.count
    }
}

macro_rules! stats_func {
    ($(#[$attr:meta])* $name:ident: Event) => {
        #[inline]
        $(#[$attr])*
        pub(crate) fn $name() {
            if cfg!(feature = "stats") {
                with_thread_stats(|stats| stats.get().$name.happened());
            }
        }
    };
    ($(#[$attr:meta])* $name:ident: Size) => {
        #[inline]
        $(#[$attr])*
        pub(crate) fn $name(size: usize) {
            if cfg!(feature = "stats") {
                let size = size as u64;
                with_thread_stats(|stats| stats.get().$name.record(size));
            }
        }
    };
}

macro_rules! stats {
    ($($(#[$attr:meta])* $names:ident: $kinds:tt),* $(,)*) => {
        /// A collection of tree statistics.
        #[derive(Default, Debug)]
        pub struct Stats {
            $($(#[$attr])*pub $names: $kinds),*
        }

        impl Stats {
            fn merge(&mut self, rhs: &Self) {
                $(self.$names.merge(&rhs.$names));*
            }
        }

        $(stats_func!{$(#[$attr])* $names: $kinds})*
    };
}

stats! {
    /// Number of rotations, from both insertion and deletion.
    rotation:            Event,

    /// Number of ancestor levels visited per insertion fixup. Values above 1 come from red uncles
    /// pushing the repair upwards.
    insert_fixup_passes: Size,

    /// Number of ancestor levels visited per deletion fixup. Values above 1 come from black
    /// siblings with black children moving the deficit upwards.
    remove_fixup_passes: Size,

    /// Number of nodes visited per descent from the root (search, insertion).
    search_depth:        Size,
}

impl Stats {
    /// Prints a summary of the stats object.
    pub fn print_summary(&self) {
        println!("{:#?}", self);

        let fixups = self.insert_fixup_passes.count() + self.remove_fixup_passes.count();
        println!(
            "{:>12}: {:>12} {:>13}: {:.4} {:>13}: {:.4}",
            "fixups",
            fixups,
            "rotation avg",
            self.rotation.count() as f64 / fixups as f64,
            "depth avg",
            self.search_depth.avg().unwrap_or_default()
        );
    }
}

/// Thread local statistics.
///
/// To reduce overhead of stats tracking, each thread has it's own `Stats` object which is flushed
/// to the global `Stats` object on thread exit or when manually requested.
#[derive(Debug)]
pub struct ThreadStats(RefCell<Stats>);

impl Drop for ThreadStats {
    fn drop(&mut self) {
        self.flush()
    }
}

impl ThreadStats {
    /// Returns the actual statistics object.
    pub fn get(&self) -> RefMut<'_, Stats> {
        self.0.borrow_mut()
    }

    /// Flushes the thread stats to the global thread stats object.
    ///
    /// After flushing, `self` is reset.
    pub fn flush(&self) {
        let mut borrow = self.get();
        GLOBAL.lock().merge(&*borrow);
        *borrow = Default::default()
    }
}

cfg_if::cfg_if! {
    if #[cfg(feature = "stats")] {
        thread_local! {
            static THREAD_STAT: ThreadStats = {
                // initialize global now, so flushing on thread exit never runs lazy_static's
                // initializer during thread teardown.
                lazy_static::initialize(&GLOBAL);
                ThreadStats(Default::default())
            };
        }

        /// Runs `f` with this thread's stats. Returns None if the feature is disabled, or the
        /// thread local has already been destroyed.
        pub fn with_thread_stats<F: FnOnce(&ThreadStats) -> R, R>(f: F) -> Option<R> {
            THREAD_STAT.try_with(f).ok()
        }
    } else {
        /// Runs `f` with this thread's stats. Returns None if the feature is disabled, or the
        /// thread local has already been destroyed.
        pub fn with_thread_stats<F: FnOnce(&ThreadStats) -> R, R>(_: F) -> Option<R> {
            None
        }
    }
}

lazy_static::lazy_static! {
    static ref GLOBAL: Mutex<Stats> = Mutex::default();
}

/// Returns the global stats object, or None if the feature is disabled.
pub fn stats() -> Option<impl Deref<Target = Stats>> {
    if cfg!(feature = "stats") {
        Some(GLOBAL.lock())
    } else {
        None::<MutexGuard<'static, Stats>>
    }
}

/// Merges this thread's stats into the global stats object.
pub fn flush_thread_stats() {
    let _ = with_thread_stats(ThreadStats::flush);
}

/// Prints a summary of the global stats object.
///
/// It may be necessary to run `stats::flush_thread_stats()` first.
pub fn print_stats() {
    match self::stats() {
        Some(stats) => stats.print_summary(),
        None => println!("`intrusive-rbtree/stats` feature is not enabled"),
    }
}
