use bevy_ecs::prelude::Resource;

/// Reference simulation rate. Movement constants are tuned per tick at this rate.
pub const DEFAULT_TICK_RATE: f64 = 60.0;

#[derive(Resource, Clone, Copy, Debug)]
pub struct WorldTime {
    pub elapsed: f64,
    pub delta: f64,
    pub time_scale: f64,
    pub frame_count: u64,
}

impl Default for WorldTime {
    fn default() -> Self {
        WorldTime {
            elapsed: 0.0,
            delta: 1.0 / DEFAULT_TICK_RATE,
            time_scale: 1.0,
            frame_count: 0,
        }
    }
}

impl WorldTime {
    pub fn with_time_scale(mut self, time_scale: f64) -> Self {
        self.time_scale = time_scale;
        self
    }
}
