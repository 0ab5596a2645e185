/// Physical parameters of the spring
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpringParams {
    /// Hooke's constant (mass is normalized to 1)
    pub spring_constant: f64,
    /// Resting height of the tip above the anchor
    pub equilibrium: f64,
    /// Offset from equilibrium the tip starts at
    pub initial_displacement: f64,
}

impl Default for SpringParams {
    fn default() -> Self {
        SpringParams {
            spring_constant: 0.15,
            equilibrium: 300.0,
            initial_displacement: 75.0,
        }
    }
}

/// Position and velocity of the spring tip
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct OscillatorState {
    /// Height of the tip above the anchor
    pub position: f64,
    pub velocity: f64,
}

/// Copy of the oscillator state handed to the render loop
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Snapshot {
    pub tick: u64,
    pub position: f64,
    pub velocity: f64,
    /// Whether the ticker was paused when the snapshot was taken
    pub paused: bool,
}

/// Undamped single spring, integrated one step per tick
#[derive(Clone, Debug)]
pub struct Simulator {
    params: SpringParams,
    state: OscillatorState,
    tick: u64,
}

impl Simulator {
    pub fn new(params: SpringParams) -> Self {
        let mut sim = Simulator {
            params,
            state: OscillatorState::default(),
            tick: 0,
        };
        sim.set_displacement(params.initial_displacement);
        sim
    }

    pub fn params(&self) -> &SpringParams {
        &self.params
    }

    pub fn state(&self) -> OscillatorState {
        self.state
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Offset of the tip from equilibrium
    pub fn displacement(&self) -> f64 {
        self.state.position - self.params.equilibrium
    }

    /// Places the tip at `equilibrium + displacement`, leaving velocity untouched
    pub fn set_displacement(&mut self, displacement: f64) {
        self.state.position = self.params.equilibrium + displacement;
    }

    /// Back to the initial displacement at rest, tick counter cleared
    pub fn reset(&mut self) {
        self.state = OscillatorState::default();
        self.set_displacement(self.params.initial_displacement);
        self.tick = 0;
    }

    /// Advances the spring by one tick.
    ///
    /// Hooke's Law gives the acceleration, which is folded into the velocity
    /// first; the position then moves by the updated velocity.
    pub fn advance(&mut self) {
        let displacement = self.params.equilibrium - self.state.position;
        let acceleration = self.params.spring_constant * displacement;
        self.state.velocity += acceleration;
        self.state.position += self.state.velocity;
        self.tick += 1;
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            tick: self.tick,
            position: self.state.position,
            velocity: self.state.velocity,
            paused: false,
        }
    }

    /// The current snapshot followed by one snapshot per tick, `ticks` ticks long
    pub fn trajectory(mut self, ticks: u64) -> impl Iterator<Item = Snapshot> {
        let first = self.snapshot();
        std::iter::once(first).chain((0..ticks).map(move |_| {
            self.advance();
            self.snapshot()
        }))
    }
}
