// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// TIMING UTILITIES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//
// Medição de tempo das etapas do enriquecimento.
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use std::time::{Duration, Instant};

use serde::Serialize;

/// Timer para medir duração de uma etapa
pub struct ActionTimer {
    start: Instant,
    action_name: String,
}

impl ActionTimer {
    /// Inicia um novo timer para uma etapa
    pub fn start(action_name: &str) -> Self {
        Self {
            start: Instant::now(),
            action_name: action_name.to_string(),
        }
    }

    /// Tempo decorrido em milissegundos
    pub fn elapsed_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }

    /// Tempo decorrido como Duration
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Para o timer e loga o tempo decorrido (debug)
    pub fn stop_and_log(self) -> u64 {
        let elapsed = self.elapsed_ms();
        log::debug!("⏱️  {} completado em {}ms", self.action_name, elapsed);
        elapsed
    }
}

/// Tempo gasto em cada etapa de uma requisição (ms)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StageTimings {
    pub cache_read_ms: u64,
    pub fanout_ms: u64,
    pub extract_ms: u64,
    pub merge_ms: u64,
    pub cache_write_ms: u64,
}

impl StageTimings {
    /// Soma das etapas
    pub fn total_ms(&self) -> u64 {
        self.cache_read_ms + self.fanout_ms + self.extract_ms + self.merge_ms + self.cache_write_ms
    }

    /// Resumo em uma linha
    pub fn summary(&self) -> String {
        format!(
            "cache_read={}ms fanout={}ms extract={}ms merge={}ms cache_write={}ms",
            self.cache_read_ms, self.fanout_ms, self.extract_ms, self.merge_ms, self.cache_write_ms
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;

    #[test]
    fn test_action_timer() {
        let timer = ActionTimer::start("test");
        sleep(Duration::from_millis(10));
        assert!(timer.elapsed() >= Duration::from_millis(10));
        assert!(timer.stop_and_log() >= 10);
    }

    #[test]
    fn test_stage_timings_total() {
        let timings = StageTimings {
            cache_read_ms: 1,
            fanout_ms: 100,
            extract_ms: 5,
            merge_ms: 2,
            cache_write_ms: 1,
        };
        assert_eq!(timings.total_ms(), 109);
        assert!(timings.summary().contains("fanout=100ms"));
    }
}
