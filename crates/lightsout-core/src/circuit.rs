//! Construction of the Grover search circuit.
//!
//! Register layout (20 qubits, 9 classical bits):
//!
//! ```text
//! tile[0..9]    q0..q8     board state, loaded as a basis state
//! search[0..9]  q9..q17    press bits; 0..3 free, 3..9 forced
//! oracle        q18        phase-kickback target
//! ancilla       q19        work qubit for the 3-control mcx
//! result[0..9]  c0..c8
//! ```
//!
//! Only the top-row press bits are searched. Each lower row's presses are
//! forced by whatever is still lit in the row above, so propagation copies
//! the row's residue into the next three search qubits and presses with
//! them. The board is solved iff the bottom row is dark once every row has
//! been pressed, which is what the oracle tests.

use lightsout_ir::{Circuit, ClbitId, IrResult, QubitId};
use tracing::debug;

use crate::error::LightsOutResult;
use crate::grid::{GRID_SIZE, GRID_WIDTH, Grid, NEIGHBORHOOD};

/// Tile qubits flipped by each search qubit. Same shape as the board's
/// toggle neighbourhood.
pub const PRESS_TARGETS: [&[usize]; GRID_SIZE] = NEIGHBORHOOD;

/// `(tile, search)` pairs copying a row's residue into the next row's
/// press bits. Entry `r` carries row `r` into row `r + 1`.
pub const CARRY_TARGETS: [[(usize, usize); GRID_WIDTH]; 2] =
    [[(0, 3), (1, 4), (2, 5)], [(3, 6), (4, 7), (5, 8)]];

/// Grover iterations. Close to the optimum of π/4·√8 for one marked state
/// among the eight top-row assignments.
pub const GROVER_ITERATIONS: usize = 2;

/// Number of free search qubits.
pub const FREE_VARIABLES: usize = GRID_WIDTH;

/// One step of forward propagation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropagationStage {
    /// Apply row `r`'s press bits to the tiles.
    Press(usize),
    /// Copy row `r`'s tiles into row `r + 1`'s press bits.
    Carry(usize),
}

/// Forward propagation in order. The inverse runs it backwards.
pub const FORWARD_STAGES: [PropagationStage; 5] = [
    PropagationStage::Press(0),
    PropagationStage::Carry(0),
    PropagationStage::Press(1),
    PropagationStage::Carry(1),
    PropagationStage::Press(2),
];

/// Qubit and clbit handles for the solver circuit.
#[derive(Debug, Clone)]
pub struct Registers {
    pub tile: Vec<QubitId>,
    pub search: Vec<QubitId>,
    pub oracle: QubitId,
    pub ancilla: QubitId,
    pub result: Vec<ClbitId>,
}

impl Registers {
    /// Allocate the registers on an empty circuit.
    pub fn allocate(circuit: &mut Circuit) -> Self {
        let tile = circuit.add_qreg("tile", GRID_SIZE as u32);
        let search = circuit.add_qreg("flip", GRID_SIZE as u32);
        let oracle = circuit.add_qreg("oracle", 1)[0];
        let ancilla = circuit.add_qreg("ancilla", 1)[0];
        let result = circuit.add_creg("result", GRID_SIZE as u32);
        Self {
            tile,
            search,
            oracle,
            ancilla,
            result,
        }
    }

    /// The free search qubits.
    pub fn free(&self) -> &[QubitId] {
        &self.search[..FREE_VARIABLES]
    }
}

/// CX from each press qubit onto the tiles it toggles.
///
/// `presses[k]` drives `targets[k]`, given as tile indices.
pub fn press_layer(
    circuit: &mut Circuit,
    presses: &[QubitId],
    tiles: &[QubitId],
    targets: &[&[usize]],
) -> IrResult<()> {
    for (&press, cells) in presses.iter().zip(targets) {
        for &cell in *cells {
            circuit.cx(press, tiles[cell])?;
        }
    }
    Ok(())
}

/// CX from tiles onto search qubits, one pair per `(tile, search)` entry.
pub fn carry_layer(
    circuit: &mut Circuit,
    tiles: &[QubitId],
    search: &[QubitId],
    pairs: &[(usize, usize)],
) -> IrResult<()> {
    for &(tile, flip) in pairs {
        circuit.cx(tiles[tile], search[flip])?;
    }
    Ok(())
}

/// Emit a single propagation stage.
pub fn propagation_stage(
    circuit: &mut Circuit,
    regs: &Registers,
    stage: PropagationStage,
) -> IrResult<()> {
    match stage {
        PropagationStage::Press(row) => {
            let span = row * GRID_WIDTH..(row + 1) * GRID_WIDTH;
            press_layer(
                circuit,
                &regs.search[span.clone()],
                &regs.tile,
                &PRESS_TARGETS[span],
            )
        }
        PropagationStage::Carry(row) => {
            carry_layer(circuit, &regs.tile, &regs.search, &CARRY_TARGETS[row])
        }
    }
}

/// Incrementally assembles the solver circuit.
///
/// [`ConstraintCircuitBuilder::build`] runs the whole recipe; the
/// individual stages are public so partial circuits can be checked.
#[derive(Debug, Clone)]
pub struct ConstraintCircuitBuilder {
    circuit: Circuit,
    regs: Registers,
}

impl ConstraintCircuitBuilder {
    pub fn new() -> Self {
        let mut circuit = Circuit::new("lights_out");
        let regs = Registers::allocate(&mut circuit);
        Self { circuit, regs }
    }

    /// The full circuit for `grid`, measured and bit-reversed.
    pub fn build(grid: &Grid) -> LightsOutResult<Circuit> {
        let mut builder = Self::new();
        builder.load(grid)?.initialize_search()?;
        for _ in 0..GROVER_ITERATIONS {
            builder.grover_iteration()?;
        }
        let circuit = builder.finalize()?;
        debug!(
            qubits = circuit.num_qubits(),
            gates = circuit.gate_count(),
            depth = circuit.depth(),
            "built lights-out circuit"
        );
        Ok(circuit)
    }

    pub fn registers(&self) -> &Registers {
        &self.regs
    }

    pub fn circuit(&self) -> &Circuit {
        &self.circuit
    }

    /// Direct access for preparing custom inputs ahead of a stage.
    pub fn circuit_mut(&mut self) -> &mut Circuit {
        &mut self.circuit
    }

    /// The circuit as built so far, without measurement.
    pub fn into_circuit(self) -> Circuit {
        self.circuit
    }

    /// X on each lit tile.
    pub fn load(&mut self, grid: &Grid) -> LightsOutResult<&mut Self> {
        for index in grid.lit() {
            self.circuit.x(self.regs.tile[index])?;
        }
        Ok(self)
    }

    /// Uniform superposition over the free bits; oracle qubit to |−⟩.
    pub fn initialize_search(&mut self) -> LightsOutResult<&mut Self> {
        for &q in self.regs.free() {
            self.circuit.h(q)?;
        }
        self.circuit.x(self.regs.oracle)?.h(self.regs.oracle)?;
        Ok(self)
    }

    pub fn forward_propagate(&mut self) -> LightsOutResult<&mut Self> {
        for stage in FORWARD_STAGES {
            propagation_stage(&mut self.circuit, &self.regs, stage)?;
        }
        Ok(self)
    }

    /// Every gate is a CX, so running the stages backwards undoes them.
    pub fn inverse_forward_propagate(&mut self) -> LightsOutResult<&mut Self> {
        for stage in FORWARD_STAGES.into_iter().rev() {
            propagation_stage(&mut self.circuit, &self.regs, stage)?;
        }
        Ok(self)
    }

    /// Phase-flip when the bottom row is dark.
    pub fn oracle_mark(&mut self) -> LightsOutResult<&mut Self> {
        let bottom = &self.regs.tile[2 * GRID_WIDTH..];
        for &q in bottom {
            self.circuit.x(q)?;
        }
        self.circuit
            .mcx(bottom, self.regs.oracle, Some(self.regs.ancilla))?;
        for &q in bottom {
            self.circuit.x(q)?;
        }
        Ok(self)
    }

    /// Inversion about the mean over the free bits.
    pub fn diffusion(&mut self) -> LightsOutResult<&mut Self> {
        let free = self.regs.free().to_vec();
        for &q in &free {
            self.circuit.h(q)?;
        }
        for &q in &free {
            self.circuit.x(q)?;
        }
        self.circuit
            .h(free[2])?
            .ccx(free[0], free[1], free[2])?
            .h(free[2])?;
        for &q in &free {
            self.circuit.x(q)?;
        }
        for &q in &free {
            self.circuit.h(q)?;
        }
        Ok(self)
    }

    pub fn grover_iteration(&mut self) -> LightsOutResult<&mut Self> {
        self.forward_propagate()?
            .oracle_mark()?
            .inverse_forward_propagate()?
            .diffusion()
    }

    /// Undo the oracle preparation, derive the forced presses, measure the
    /// search register and reverse bit order so the bitstring reads grid
    /// index 0 first.
    pub fn finalize(mut self) -> LightsOutResult<Circuit> {
        self.circuit.h(self.regs.oracle)?.x(self.regs.oracle)?;
        self.forward_propagate()?;
        for (&q, &c) in self.regs.search.iter().zip(&self.regs.result) {
            self.circuit.measure(q, c)?;
        }
        Ok(self.circuit.reverse_bits())
    }
}

impl Default for ConstraintCircuitBuilder {
    fn default() -> Self {
        Self::new()
    }
}
