//! Runtime configuration: thread pool and parallel-region status.
//!
//! Everything that would otherwise be process-wide state lives in a
//! [`Runtime`](struct.Runtime.html) value that is created once and passed to
//! whatever needs it.
use std::fs::File;
use std::io::Read;
use std::path::Path;
use rayon::{self, ThreadPool, ThreadPoolBuilder};
use serde_yaml;
use super::error::Result;

/// Configuration for a [`Runtime`](struct.Runtime.html).
///
/// ```yaml
/// num_threads: 4
/// max_two_j: 41
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConf {
    /// Number of worker threads; `0` lets rayon decide.
    pub num_threads: usize,
    /// Largest doubled angular momentum the recoupling oracle must support.
    pub max_two_j: i32,
}

/// `{ num_threads: 0, max_two_j: 41 }` (enough for `e_max = 20`)
impl Default for RuntimeConf {
    fn default() -> Self {
        Self { num_threads: 0, max_two_j: 41 }
    }
}

impl RuntimeConf {
    pub fn from_yaml_str(s: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(s)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let mut s = String::new();
        File::open(path)?.read_to_string(&mut s)?;
        Self::from_yaml_str(&s)
    }

    pub fn build(self) -> Result<Runtime> {
        Runtime::new(self)
    }
}

#[derive(Debug)]
pub struct Runtime {
    conf: RuntimeConf,
    pool: ThreadPool,
}

impl Runtime {
    pub fn new(conf: RuntimeConf) -> Result<Self> {
        precondition!(conf.max_two_j >= 1,
                      "max_two_j must be positive: {}", conf.max_two_j);
        let pool = ThreadPoolBuilder::new()
            .num_threads(conf.num_threads)
            .thread_name(|i| format!("jblock-worker-{}", i))
            .build()?;
        debug!("runtime: {} threads, max_two_j = {}",
               pool.current_num_threads(), conf.max_two_j);
        Ok(Self { conf, pool })
    }

    pub fn conf(&self) -> &RuntimeConf {
        &self.conf
    }

    pub fn num_threads(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Run `op` inside this runtime's thread pool.  Parallel iterators
    /// called from `op` use the pool's workers.
    pub fn install<OP, R>(&self, op: OP) -> R
        where OP: FnOnce() -> R + Send,
              R: Send,
    {
        self.pool.install(op)
    }

    /// Whether the calling thread is a worker of some rayon pool.
    pub fn in_parallel_region() -> bool {
        rayon::current_thread_index().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conf_yaml() {
        let conf = RuntimeConf::from_yaml_str("num_threads: 3\n").unwrap();
        assert_eq!(conf, RuntimeConf { num_threads: 3, max_two_j: 41 });
        let conf = RuntimeConf::from_yaml_str("{}").unwrap();
        assert_eq!(conf, RuntimeConf::default());
        assert!(RuntimeConf::from_yaml_str("num_threads: [1]").is_err());
    }

    #[test]
    fn test_runtime() {
        let rt = RuntimeConf { num_threads: 2, max_two_j: 9 }.build().unwrap();
        assert_eq!(rt.num_threads(), 2);
        assert!(!Runtime::in_parallel_region());
        assert!(rt.install(|| Runtime::in_parallel_region()));
        let e = RuntimeConf { num_threads: 1, max_two_j: 0 }.build();
        assert!(e.unwrap_err().is_precondition());
    }
}
