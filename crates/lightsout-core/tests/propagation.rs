//! Classical checks of the propagation network, run on basis states.

use lightsout_adapter_sim::Statevector;
use lightsout_core::{ConstraintCircuitBuilder, GRID_SIZE, Grid, PressVector, catalog};
use lightsout_ir::Circuit;
use proptest::prelude::*;

const SEARCH_OFFSET: usize = GRID_SIZE;

fn run(circuit: &Circuit) -> Statevector {
    let mut sv = Statevector::new(circuit.num_qubits());
    for inst in circuit.instructions() {
        sv.apply(inst);
    }
    sv
}

fn grid_from_index(index: u16) -> Grid {
    let mut bits = [0u8; GRID_SIZE];
    for (i, bit) in bits.iter_mut().enumerate() {
        *bit = ((index >> i) & 1) as u8;
    }
    Grid::from_bits(bits).unwrap()
}

fn tile_index(grid: &Grid) -> u64 {
    grid.lit().map(|i| 1u64 << i).sum()
}

/// Load `grid`, set the free bits to `free`, then apply `stages`.
fn classical_circuit(
    grid: &Grid,
    free: u8,
    stages: impl FnOnce(&mut ConstraintCircuitBuilder),
) -> (Circuit, u64) {
    let mut builder = ConstraintCircuitBuilder::new();
    builder.load(grid).unwrap();
    let mut free_index = 0u64;
    for k in 0..3 {
        if free & (1 << k) != 0 {
            let q = builder.registers().search[k];
            builder.circuit_mut().x(q).unwrap();
            free_index |= 1 << (SEARCH_OFFSET + k);
        }
    }
    stages(&mut builder);
    (builder.into_circuit(), free_index)
}

fn brute_force_solution(grid: &Grid) -> PressVector {
    (0u16..512)
        .map(|mask| {
            let mut bits = [false; GRID_SIZE];
            for (i, bit) in bits.iter_mut().enumerate() {
                *bit = mask & (1 << i) != 0;
            }
            PressVector::new(bits)
        })
        .find(|press| {
            let mut g = *grid;
            g.apply(press);
            g.is_solved()
        })
        .unwrap()
}

#[test]
fn forward_then_inverse_is_identity() {
    for index in 0u16..512 {
        let grid = grid_from_index(index);
        for free in 0u8..8 {
            let (circuit, free_index) = classical_circuit(&grid, free, |b| {
                b.forward_propagate().unwrap().inverse_forward_propagate().unwrap();
            });
            let sv = run(&circuit);
            let expected = tile_index(&grid) | free_index;
            assert!(
                (sv.probability(expected) - 1.0).abs() < 1e-12,
                "grid {index:09b}, free {free:03b}"
            );
        }
    }
}

#[test]
fn forward_with_correct_top_row_clears_board() {
    for grid in catalog::builtin() {
        let solution = brute_force_solution(&grid);
        let free = (0..3)
            .filter(|&k| solution.is_pressed(k))
            .fold(0u8, |acc, k| acc | (1 << k));

        let (circuit, _) = classical_circuit(&grid, free, |b| {
            b.forward_propagate().unwrap();
        });
        let sv = run(&circuit);

        // Tiles all dark, search register holds the full press vector.
        let expected: u64 = solution
            .pressed()
            .map(|i| 1u64 << (SEARCH_OFFSET + i))
            .sum();
        assert!(
            (sv.probability(expected) - 1.0).abs() < 1e-12,
            "board {grid:?} solution {solution}"
        );
    }
}

proptest! {
    #[test]
    fn wrong_top_row_leaves_bottom_row_lit(index in 0u16..512, free in 0u8..8) {
        let grid = grid_from_index(index);
        let solution = brute_force_solution(&grid);
        let correct = (0..3)
            .filter(|&k| solution.is_pressed(k))
            .fold(0u8, |acc, k| acc | (1 << k));
        prop_assume!(free != correct);

        let (circuit, _) = classical_circuit(&grid, free, |b| {
            b.forward_propagate().unwrap();
        });
        let sv = run(&circuit);
        let marginal = sv.marginal(&[(6, 0), (7, 1), (8, 2)]);
        prop_assert_eq!(marginal.len(), 1);
        prop_assert_ne!(marginal[0].0, 0);
    }
}
