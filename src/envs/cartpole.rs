//! Cart-pole simulator
use super::{EnvError, EnvStep, Environment, Observation};
use crate::Prng;
use rand::distributions::{Distribution, Uniform};
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

/// Configuration for the [`CartPole`] environment.
#[derive(Debug, Default, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartPoleConfig {
    /// Physics configuration
    pub physics: PhysicalConstants,
    /// Episode configuration
    pub params: EnvironmentParams,
}

impl CartPoleConfig {
    /// Build a simulator whose initial states are drawn from a generator seeded with `seed`.
    pub fn build(&self, seed: u64) -> CartPole {
        CartPole::new(self.physics, self.params, seed)
    }
}

/// Cart-pole simulator.
///
/// A cart on a frictional track carries a pole on a hinge. Each step pushes the cart left or
/// right; the episode terminates once the cart leaves the track or the pole tilts past the
/// maximum angle. Every step yields a reward of 1.
///
/// Dynamics follow Barto et al. (1983) with the corrected friction terms of Florian (2005).
/// Default constants match the `CartPole-v1` task.
#[derive(Debug, Clone, PartialEq)]
pub struct CartPole {
    physics: Dynamics,
    params: EnvironmentParams,
    rng: Prng,
    /// `None` until the first reset and after a terminating step.
    state: Option<CartPoleState>,
}

impl CartPole {
    pub fn new(physics: PhysicalConstants, params: EnvironmentParams, seed: u64) -> Self {
        Self {
            physics: physics.into(),
            params,
            rng: Prng::seed_from_u64(seed),
            state: None,
        }
    }

    fn is_out_of_bounds(&self, state: &PoleState) -> bool {
        state.cart_position.abs() > self.params.max_pos
            || state.pole_angle.abs() > self.params.max_angle
    }
}

impl Default for CartPole {
    fn default() -> Self {
        CartPoleConfig::default().build(0)
    }
}

/// Direction in which to push the cart.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Push {
    Left,
    Right,
}

impl Push {
    /// Action index of this push.
    pub const fn index(self) -> usize {
        match self {
            Self::Left => 0,
            Self::Right => 1,
        }
    }

    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Self::Left),
            1 => Some(Self::Right),
            _ => None,
        }
    }
}

impl Environment for CartPole {
    fn observation_dim(&self) -> usize {
        4
    }

    fn num_actions(&self) -> usize {
        2
    }

    fn reset(&mut self) -> Result<Observation, EnvError> {
        let dist = Uniform::new_inclusive(-0.05, 0.05);
        let pole = PoleState {
            cart_position: dist.sample(&mut self.rng),
            cart_velocity: dist.sample(&mut self.rng),
            pole_angle: dist.sample(&mut self.rng),
            pole_angular_velocity: dist.sample(&mut self.rng),
        };
        self.state = Some(CartPoleState {
            pole,
            normal_velocity_positive: true,
        });
        Ok(pole.observation())
    }

    fn step(&mut self, action: usize) -> Result<EnvStep, EnvError> {
        let push = Push::from_index(action).ok_or(EnvError::InvalidAction {
            action,
            num_actions: self.num_actions(),
        })?;
        let state = self.state.take().ok_or(EnvError::EpisodeFinished)?;

        let force = match push {
            Push::Left => -self.params.action_force,
            Push::Right => self.params.action_force,
        };
        let next = self.physics.advance(&state, force);
        let terminated = self.is_out_of_bounds(&next.pole);
        let observation = next.pole.observation();
        if !terminated {
            self.state = Some(next);
        }
        Ok(EnvStep {
            observation,
            reward: 1.0,
            terminated,
            truncated: false,
        })
    }
}

/// Physical constants for the [`CartPole`] environment.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhysicalConstants {
    /// Downward acceleration of gravity (m/s^2)
    pub gravity: f64,
    /// Mass of the cart (kg)
    pub mass_cart: f64,
    /// Mass of the pole (kg)
    pub mass_pole: f64,
    /// Half the length of the pole (m)
    pub length_half_pole: f64,
    /// Friction coefficient between the cart and the track.
    pub friction_cart: f64,
    /// Friction coefficient of the hinge.
    pub friction_pole: f64,
    /// Integration time step (s)
    pub time_step: f64,
}

impl Default for PhysicalConstants {
    fn default() -> Self {
        Self {
            gravity: 9.8,
            mass_cart: 1.0,
            mass_pole: 0.1,
            length_half_pole: 0.5,
            friction_cart: 0.01,
            friction_pole: 0.01,
            time_step: 0.02,
        }
    }
}

/// Episode parameters of the [`CartPole`] environment.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentParams {
    /// Magnitude of the force (N) applied by each push.
    pub action_force: f64,
    /// Maximum absolute cart position (m) before the episode terminates.
    pub max_pos: f64,
    /// Maximum absolute pole angle (radians) before the episode terminates.
    pub max_angle: f64,
}

impl Default for EnvironmentParams {
    fn default() -> Self {
        Self {
            action_force: 10.0,
            max_pos: 2.4,
            max_angle: 12.0_f64.to_radians(),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
struct PoleState {
    cart_position: f64,
    cart_velocity: f64,
    pole_angle: f64,
    pole_angular_velocity: f64,
}

impl PoleState {
    #[allow(clippy::cast_possible_truncation)]
    fn observation(&self) -> Observation {
        vec![
            self.cart_position as f32,
            self.cart_velocity as f32,
            self.pole_angle as f32,
            self.pole_angular_velocity as f32,
        ]
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
struct CartPoleState {
    pole: PoleState,
    /// Sign of `normal_force * cart_velocity` on the previous step.
    ///
    /// The friction term depends on this sign, which in turn depends on the friction term.
    /// The previous sign is tried first and flipped if the result is inconsistent.
    normal_velocity_positive: bool,
}

/// Physical constants with derived terms precomputed.
#[derive(Debug, Copy, Clone, PartialEq)]
struct Dynamics {
    c: PhysicalConstants,
    /// `gravity * (mass_cart + mass_pole)`
    total_weight: f64,
    /// `1 / (mass_cart + mass_pole)`
    inv_total_mass: f64,
    /// `mass_pole * length_half_pole`
    pole_moment: f64,
}

impl From<PhysicalConstants> for Dynamics {
    fn from(c: PhysicalConstants) -> Self {
        let total_mass = c.mass_cart + c.mass_pole;
        Self {
            c,
            total_weight: c.gravity * total_mass,
            inv_total_mass: total_mass.recip(),
            pole_moment: c.mass_pole * c.length_half_pole,
        }
    }
}

/// Trigonometric and velocity terms shared by the acceleration equations.
#[derive(Debug, Copy, Clone)]
struct Terms {
    sin: f64,
    cos: f64,
    angular_velocity_sq: f64,
}

impl Dynamics {
    /// Semi-implicit Euler step under a horizontal force (N) applied to the cart.
    fn advance(&self, state: &CartPoleState, force: f64) -> CartPoleState {
        let pole = &state.pole;
        let (sin, cos) = pole.pole_angle.sin_cos();
        let terms = Terms {
            sin,
            cos,
            angular_velocity_sq: pole.pole_angular_velocity * pole.pole_angular_velocity,
        };

        let mut friction = if state.normal_velocity_positive {
            self.c.friction_cart
        } else {
            -self.c.friction_cart
        };
        let mut angular_acc = self.angular_acceleration(pole, force, friction, terms);
        let mut normal = self.normal_force(angular_acc, terms);
        let normal_velocity_positive = (normal * pole.cart_velocity).is_sign_positive();
        if normal_velocity_positive != state.normal_velocity_positive {
            friction = -friction;
            angular_acc = self.angular_acceleration(pole, force, friction, terms);
            normal = self.normal_force(angular_acc, terms);
        }

        let pole_force =
            self.pole_moment * (terms.angular_velocity_sq * sin + angular_acc * cos);
        let cart_acc = (force + pole_force - friction * normal) * self.inv_total_mass;

        let dt = self.c.time_step;
        let cart_velocity = pole.cart_velocity + dt * cart_acc;
        CartPoleState {
            pole: PoleState {
                cart_position: pole.cart_position + dt * cart_velocity,
                cart_velocity,
                pole_angle: pole.pole_angle + dt * pole.pole_angular_velocity,
                pole_angular_velocity: pole.pole_angular_velocity + dt * angular_acc,
            },
            normal_velocity_positive,
        }
    }

    /// Pole angular acceleration; equation (21) of Florian (2005).
    fn angular_acceleration(&self, pole: &PoleState, force: f64, friction: f64, t: Terms) -> f64 {
        let alpha = (-force
            - self.pole_moment * t.angular_velocity_sq * (t.sin + friction * t.cos))
            * self.inv_total_mass;
        let beta = self.c.friction_pole * pole.pole_angular_velocity / self.pole_moment;
        let numerator = self.c.gravity * t.sin + t.cos * (alpha + self.c.gravity * friction) - beta;
        let denominator = self.c.length_half_pole
            * (4.0 / 3.0 - self.c.mass_pole * t.cos * self.inv_total_mass * (t.cos - friction));
        numerator / denominator
    }

    /// Normal force (N) of the cart on the track, positive downwards.
    fn normal_force(&self, angular_acc: f64, t: Terms) -> f64 {
        self.total_weight - self.pole_moment * (angular_acc * t.sin + t.angular_velocity_sq * t.cos)
    }
}
