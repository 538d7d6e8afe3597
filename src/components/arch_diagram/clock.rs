use super::config::ClockConfig;

/// Monotonic decorative clock; nothing in layout reads it.
#[derive(Clone, Debug)]
pub struct AnimationClock {
	time: f64,
	increment: f64,
	running: bool,
}

impl AnimationClock {
	pub fn new(config: &ClockConfig) -> Self {
		Self {
			time: 0.0,
			increment: config.increment,
			running: true,
		}
	}

	pub fn tick(&mut self) {
		if self.running {
			self.time += self.increment;
		}
	}

	/// Stops the clock for good and discards its value.
	pub fn stop(&mut self) {
		self.running = false;
		self.time = 0.0;
	}

	pub fn time(&self) -> f64 {
		self.time
	}

	#[cfg(test)]
	pub fn is_running(&self) -> bool {
		self.running
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn advances_by_fixed_increment() {
		let mut clock = AnimationClock::new(&ClockConfig { increment: 0.5, interval_ms: 16 });
		for _ in 0..4 {
			clock.tick();
		}
		assert_eq!(clock.time(), 2.0);
	}

	#[test]
	fn stopped_clock_is_discarded() {
		let mut clock = AnimationClock::new(&ClockConfig::default());
		clock.tick();
		clock.stop();
		clock.tick();
		assert_eq!(clock.time(), 0.0);
		assert!(!clock.is_running());
	}
}
