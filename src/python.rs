use numpy::ndarray::Array2;
use numpy::{IntoPyArray, PyArray2};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use crate::config::SimConfig;
use crate::core::particle::DIM;
use crate::core::Simulation;

fn py_err<E: ToString>(e: E) -> PyErr {
    PyValueError::new_err(e.to_string())
}

fn to_array(rows: &[[f64; DIM]]) -> Array2<f64> {
    let mut arr = Array2::<f64>::zeros((rows.len(), DIM));
    for (i, row) in rows.iter().enumerate() {
        for k in 0..DIM {
            arr[[i, k]] = row[k];
        }
    }
    arr
}

/// Python-facing wrapper around the frame-driven disk simulation.
///
/// - __new__(num_particles=50, width=500, height=500, radius=5, mass=1, speed=2.5, seed=None)
/// - tick() -> (pair, wall, stale) events handled this frame
/// - run(frames)
/// - get_positions() / get_velocities() -> np.ndarray, shape (N, 2)
#[pyclass]
pub struct DiskSim {
    sim: Simulation,
}

#[pymethods]
impl DiskSim {
    /// Spawn a random, non-overlapping set of equal disks.
    ///
    /// Errors: raises ValueError on invalid parameters.
    #[new]
    #[pyo3(signature = (num_particles=50, width=500.0, height=500.0, radius=5.0, mass=1.0, speed=2.5, seed=None))]
    fn new(
        num_particles: usize,
        width: f64,
        height: f64,
        radius: f64,
        mass: f64,
        speed: f64,
        seed: Option<u64>,
    ) -> PyResult<Self> {
        let config = SimConfig {
            width,
            height,
            radius,
            mass,
            particle_count: num_particles,
            speed,
            seed,
        };
        let sim = Simulation::new(&config).map_err(py_err)?;
        Ok(Self { sim })
    }

    /// Build from a JSON configuration document.
    #[staticmethod]
    fn from_json(config: &str) -> PyResult<Self> {
        let config = SimConfig::from_json(config).map_err(py_err)?;
        let sim = Simulation::new(&config).map_err(py_err)?;
        Ok(Self { sim })
    }

    /// Advance one frame; returns (pair, wall, stale) counts for that frame.
    fn tick(&mut self) -> PyResult<(u64, u64, u64)> {
        let report = self.sim.tick().map_err(py_err)?;
        let c = report.collisions;
        Ok((c.pair_collisions, c.wall_collisions, c.stale_events))
    }

    /// Advance `frames` frames (releases the GIL during computation).
    fn run(&mut self, py: Python<'_>, frames: u64) -> PyResult<()> {
        py.detach(|| self.sim.run(frames)).map_err(py_err)
    }

    #[getter]
    fn frame(&self) -> u64 {
        self.sim.frame()
    }

    /// Return positions as a NumPy array of shape (N, 2), dtype=float64.
    fn get_positions<'py>(&self, py: Python<'py>) -> PyResult<Py<PyArray2<f64>>> {
        let arr = to_array(&self.sim.positions());
        Ok(arr.into_pyarray(py).to_owned().into())
    }

    /// Return velocities as a NumPy array of shape (N, 2), dtype=float64.
    fn get_velocities<'py>(&self, py: Python<'py>) -> PyResult<Py<PyArray2<f64>>> {
        let arr = to_array(&self.sim.velocities());
        Ok(arr.into_pyarray(py).to_owned().into())
    }

    /// Cumulative (pair, wall, stale) event counts.
    fn get_stats(&self) -> (u64, u64, u64) {
        let s = self.sim.stats();
        (s.pair_collisions, s.wall_collisions, s.stale_events)
    }

    fn get_kinetic_energy(&self) -> f64 {
        self.sim.kinetic_energy()
    }

    /// Current state as a JSON document (frame, radius, particles).
    fn snapshot_json(&self) -> PyResult<String> {
        self.sim.snapshot_json().map_err(py_err)
    }
}

/// The disksim Python module entry point.
#[pymodule]
fn disksim(_py: Python<'_>, m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<DiskSim>()?;
    Ok(())
}
