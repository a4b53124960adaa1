use crate::config::{validate_box, SimConfig};
use crate::core::particle::DIM;
use crate::core::predict::{time_to_hit, time_to_hit_wall};
use crate::core::resolve::{bounce_off, bounce_off_wall};
use crate::core::{CollisionEvent, EventKind, EventQueue, Particle};
use crate::error::{Error, Result};
use log::{debug, trace};
use rand::{rng, rngs::StdRng, Rng, SeedableRng};
use serde::Serialize;

/// Placement attempts per particle before spawning gives up.
const MAX_PLACEMENT_ATTEMPTS: usize = 100_000;

/// Resolved and discarded event counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CollisionStats {
    pub pair_collisions: u64,
    pub wall_collisions: u64,
    pub stale_events: u64,
}

impl CollisionStats {
    /// Events that changed a velocity.
    pub fn resolved(&self) -> u64 {
        self.pair_collisions + self.wall_collisions
    }

    fn absorb(&mut self, other: &CollisionStats) {
        self.pair_collisions += other.pair_collisions;
        self.wall_collisions += other.wall_collisions;
        self.stale_events += other.stale_events;
    }
}

/// Outcome of a single [`Simulation::tick`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TickReport {
    /// Frame counter after the tick.
    pub frame: u64,
    /// Events popped during the tick.
    pub collisions: CollisionStats,
}

/// Render-ready view of the simulation.
#[derive(Debug, Serialize)]
pub struct Snapshot<'a> {
    pub frame: u64,
    pub radius: f64,
    pub particles: &'a [Particle],
}

/// Frame-driven hard-disk simulation in a `width` × `height` box.
///
/// Particle positions always describe the instant `frame`. Each tick resolves
/// every predicted collision scheduled before that instant, then drifts all
/// particles by one frame.
#[derive(Debug)]
pub struct Simulation {
    frame: u64,
    width: f64,
    height: f64,
    radius: f64,
    particles: Vec<Particle>,
    pq: EventQueue,
    stats: CollisionStats,
}

impl Simulation {
    /// Spawn `config.particle_count` non-overlapping disks with random directions.
    ///
    /// Positions are uniform in `[r, width - r] × [r, height - r]`. Each disk moves at
    /// `config.speed`: `|vx|` is uniform in `[0, speed]`, `|vy|` takes the remainder,
    /// and each axis gets an independent random sign.
    pub fn new(config: &SimConfig) -> Result<Self> {
        config.validate()?;
        let mut rng: StdRng = match config.seed {
            Some(s) => SeedableRng::seed_from_u64(s),
            None => SeedableRng::seed_from_u64(rng().random()),
        };

        let (w, h, radius) = (config.width, config.height, config.radius);
        let mut particles: Vec<Particle> = Vec::with_capacity(config.particle_count);
        for index in 0..config.particle_count {
            let id = u32::try_from(index)
                .map_err(|_| Error::InvalidParam("too many particles".into()))?;
            let mut attempts = 0usize;
            let r = loop {
                if attempts >= MAX_PLACEMENT_ATTEMPTS {
                    return Err(Error::InvalidParam(format!(
                        "failed to place particle {id} without overlap; try fewer particles or smaller radius"
                    )));
                }
                attempts += 1;
                let r = [
                    rng.random_range(radius..=w - radius),
                    rng.random_range(radius..=h - radius),
                ];
                if !overlaps_existing(&particles, &r, radius) {
                    break r;
                }
            };

            let vx = rng.random_range(0.0..=config.speed);
            let vy = (config.speed * config.speed - vx * vx).max(0.0).sqrt();
            let v = [vx * random_sign(&mut rng), vy * random_sign(&mut rng)];
            particles.push(Particle::new(id, r, v, config.mass)?);
        }

        Self::from_particles(particles, w, h, radius)
    }

    /// Build a simulation from explicit particles and seed the event queue.
    ///
    /// Each particle's `id` must equal its index. An empty set is allowed.
    pub fn from_particles(
        particles: Vec<Particle>,
        width: f64,
        height: f64,
        radius: f64,
    ) -> Result<Self> {
        validate_box(width, height, radius)?;
        if u32::try_from(particles.len()).is_err() {
            return Err(Error::InvalidParam("too many particles".into()));
        }
        validate_particles(&particles, width, height)?;

        let n = particles.len();
        let mut sim = Self {
            frame: 0,
            width,
            height,
            radius,
            particles,
            pq: EventQueue::with_capacity(2 * n),
            stats: CollisionStats::default(),
        };
        sim.schedule_initial_events()?;
        debug!(
            "initialized {} particles in {}x{} box (r = {}), {} events scheduled",
            n,
            width,
            height,
            radius,
            sim.pq.len()
        );
        Ok(sim)
    }

    /// Current frame counter.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Box extents (width, height).
    pub fn box_size(&self) -> [f64; DIM] {
        [self.width, self.height]
    }

    /// Common disk radius.
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Number of particles.
    pub fn num_particles(&self) -> usize {
        self.particles.len()
    }

    /// Particle arena, indexed by id.
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Mutable access for hosts; call [`Simulation::rebuild_event_queue`] afterwards.
    pub fn particles_mut(&mut self) -> &mut [Particle] {
        &mut self.particles
    }

    /// Positions as a Vec of fixed-size arrays.
    pub fn positions(&self) -> Vec<[f64; DIM]> {
        self.particles.iter().map(|p| p.r).collect()
    }

    /// Velocities as a Vec of fixed-size arrays.
    pub fn velocities(&self) -> Vec<[f64; DIM]> {
        self.particles.iter().map(|p| p.v).collect()
    }

    /// Pending entries in the event queue, stale ones included.
    pub fn pending_events(&self) -> usize {
        self.pq.len()
    }

    /// Pending event queue (read-only).
    pub fn queue(&self) -> &EventQueue {
        &self.pq
    }

    /// Cumulative event counts since initialization.
    pub fn stats(&self) -> CollisionStats {
        self.stats
    }

    /// Total kinetic energy (diagnostic).
    pub fn kinetic_energy(&self) -> f64 {
        self.particles.iter().map(|p| p.kinetic_energy()).sum()
    }

    /// Total linear momentum (diagnostic).
    pub fn momentum(&self) -> [f64; DIM] {
        self.particles.iter().fold([0.0; DIM], |acc, p| {
            let m = p.momentum();
            [acc[0] + m[0], acc[1] + m[1]]
        })
    }

    /// Borrowed view of the state a renderer needs.
    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            frame: self.frame,
            radius: self.radius,
            particles: &self.particles,
        }
    }

    /// Serialize the current [`Snapshot`] as JSON.
    pub fn snapshot_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.snapshot())?)
    }

    /// Advance exactly one frame.
    ///
    /// Drains every event scheduled strictly before the current frame, discarding
    /// stale ones, then drifts all particles by one frame and bumps the counter.
    pub fn tick(&mut self) -> Result<TickReport> {
        let now = self.frame as f64;
        let mut collisions = CollisionStats::default();

        while self.pq.peek().is_some_and(|ev| ev.time_f64() < now) {
            let ev = self.pq.extract_min()?;
            if !ev.is_current(&self.particles) {
                trace!("frame {}: stale {:?}", self.frame, ev.kind);
                collisions.stale_events += 1;
                continue;
            }

            match ev.kind {
                EventKind::Wall { i } => {
                    let ii = i as usize;
                    let reflected = bounce_off_wall(
                        &mut self.particles[ii],
                        self.width,
                        self.height,
                        self.radius,
                    );
                    trace!(
                        "frame {}: wall hit by {} at t = {} (reflected: {})",
                        self.frame,
                        i,
                        ev.time,
                        reflected
                    );
                    collisions.wall_collisions += 1;
                    self.reschedule_for_particle(ii)?;
                }
                EventKind::Pair { i, j } => {
                    let (ii, jj) = (i as usize, j as usize);
                    let (a, b) = pair_mut(&mut self.particles, ii, jj)?;
                    bounce_off(a, b)?;
                    trace!(
                        "frame {}: {} and {} collide at t = {}",
                        self.frame,
                        i,
                        j,
                        ev.time
                    );
                    collisions.pair_collisions += 1;
                    self.reschedule_for_particle(ii)?;
                    self.reschedule_for_particle(jj)?;
                }
            }
        }

        for p in &mut self.particles {
            p.advance(1.0);
        }
        self.frame += 1;
        self.stats.absorb(&collisions);

        if collisions.resolved() > 0 {
            debug!(
                "frame {}: {} pair, {} wall, {} stale; {} pending",
                self.frame,
                collisions.pair_collisions,
                collisions.wall_collisions,
                collisions.stale_events,
                self.pq.len()
            );
        }
        Ok(TickReport {
            frame: self.frame,
            collisions,
        })
    }

    /// Tick `frames` times.
    pub fn run(&mut self, frames: u64) -> Result<()> {
        for _ in 0..frames {
            self.tick()?;
        }
        Ok(())
    }

    /// Rebuild the event queue from the current particle states and box.
    ///
    /// Call after modifying particles through [`Simulation::particles_mut`].
    /// Errors with `InvalidParam`, leaving the queue untouched, if the particles
    /// no longer satisfy the same checks as [`Simulation::from_particles`].
    pub fn rebuild_event_queue(&mut self) -> Result<()> {
        validate_particles(&self.particles, self.width, self.height)?;
        self.pq.clear();
        self.schedule_initial_events()
    }

    // ============ Internal helpers ============

    fn schedule_initial_events(&mut self) -> Result<()> {
        let now = self.frame as f64;
        let n = self.particles.len();

        // Pairs already in contact or overlapping are left alone.
        for i in 0..n {
            for j in (i + 1)..n {
                let (a, b) = (&self.particles[i], &self.particles[j]);
                if let Some(t) = time_to_hit(a, b, self.radius).filter(|&t| t > 0.0) {
                    self.pq.insert(CollisionEvent::pair(now + t, a, b)?);
                }
            }
        }

        for p in &self.particles {
            if let Some(t) = time_to_hit_wall(p, self.width, self.height, self.radius) {
                self.pq.insert(CollisionEvent::wall(now + t, p)?);
            }
        }

        Ok(())
    }

    /// Schedule the next wall event for `i` and its next collision with every other particle.
    fn reschedule_for_particle(&mut self, i: usize) -> Result<()> {
        let now = self.frame as f64;
        let p = &self.particles[i];

        if let Some(t) = time_to_hit_wall(p, self.width, self.height, self.radius) {
            self.pq.insert(CollisionEvent::wall(now + t, p)?);
        }

        for (j, q) in self.particles.iter().enumerate() {
            if j == i {
                continue;
            }
            let (a, b) = if i < j { (p, q) } else { (q, p) };
            if let Some(t) = time_to_hit(a, b, self.radius) {
                self.pq.insert(CollisionEvent::pair(now + t, a, b)?);
            }
        }

        Ok(())
    }
}

// ============ Utility helpers ============

/// Ids must match indices; mass, position and velocity must be usable and centers inside the box.
fn validate_particles(particles: &[Particle], width: f64, height: f64) -> Result<()> {
    for (index, p) in particles.iter().enumerate() {
        if p.id as usize != index {
            return Err(Error::InvalidParam(format!(
                "particle at index {index} has id {}",
                p.id
            )));
        }
        if !p.mass.is_finite() || p.mass <= 0.0 {
            return Err(Error::InvalidParam(format!(
                "particle {index}: mass must be finite and > 0"
            )));
        }
        if !p.r.iter().chain(&p.v).all(|x| x.is_finite()) {
            return Err(Error::InvalidParam(format!(
                "particle {index}: position and velocity must be finite"
            )));
        }
        if !(0.0..=width).contains(&p.r[0]) || !(0.0..=height).contains(&p.r[1]) {
            return Err(Error::InvalidParam(format!(
                "particle {index} lies outside the box"
            )));
        }
    }
    Ok(())
}

#[inline]
fn random_sign<R: Rng>(rng: &mut R) -> f64 {
    if rng.random_bool(0.5) {
        1.0
    } else {
        -1.0
    }
}

/// Two distinct mutable particles from the arena.
fn pair_mut(ps: &mut [Particle], i: usize, j: usize) -> Result<(&mut Particle, &mut Particle)> {
    if i == j || i.max(j) >= ps.len() {
        return Err(Error::InvalidParam(format!(
            "invalid particle pair ({i}, {j})"
        )));
    }
    if i < j {
        let (lo, hi) = ps.split_at_mut(j);
        Ok((&mut lo[i], &mut hi[0]))
    } else {
        let (lo, hi) = ps.split_at_mut(i);
        Ok((&mut hi[0], &mut lo[j]))
    }
}

fn overlaps_existing(existing: &[Particle], r: &[f64; DIM], radius: f64) -> bool {
    let min_sq = (2.0 * radius) * (2.0 * radius);
    existing.iter().any(|p| {
        let dx = r[0] - p.r[0];
        let dy = r[1] - p.r[1];
        dx * dx + dy * dy < min_sq
    })
}
