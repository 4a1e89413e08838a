//! Run statistics, printed at exit the way the teacher's `print_stats` does,
//! but for the one counter that means anything to an incomplete local-search
//! solver: flips and CPU time.

use cpu_time::ProcessTime;

pub struct Stats {
    start: ProcessTime,
    flips: u64,
}

impl Stats {
    pub fn start() -> Self {
        Stats {
            start: ProcessTime::now(),
            flips: 0,
        }
    }

    pub fn record_flip(&mut self) {
        self.flips += 1;
    }

    pub fn set_flips(&mut self, flips: u64) {
        self.flips = flips;
    }

    /// Prints a small stats block to stderr, in the teacher's `c `-prefixed
    /// DIMACS-solver-output style.
    pub fn print(&self) {
        let cpu = self.start.elapsed().as_secs_f64();
        eprintln!("c flips                : {:<12}", self.flips);
        eprintln!(
            "c flips/sec            : {:.0}",
            if cpu > 0.0 {
                self.flips as f64 / cpu
            } else {
                0.0
            }
        );
        eprintln!("c CPU time             : {:.3} s", cpu);
    }
}
