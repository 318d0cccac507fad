#![no_main]
use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use memfit::{compare, Limits, Strategy, Workload};

#[derive(Arbitrary, Debug)]
struct Input {
    blocks: Vec<u32>,
    processes: Vec<u32>,
}

fuzz_target!(|input: Input| {
    let blocks: Vec<u64> = input.blocks.iter().map(|&b| b as u64).collect();
    let processes: Vec<u64> = input.processes.iter().map(|&p| p as u64).collect();

    for strategy in Strategy::ALL {
        let alloc = strategy.run(blocks.clone(), &processes);
        assert_eq!(alloc.assignments.len(), processes.len());

        // No block may hold more than its original size
        let mut placed = vec![0u64; blocks.len()];
        for (i, slot) in alloc.assignments.iter().enumerate() {
            if let Some(block) = slot {
                placed[*block] += processes[i];
            }
        }
        for (j, &original) in blocks.iter().enumerate() {
            assert!(placed[j] <= original);
            assert_eq!(original - alloc.remaining[j], placed[j]);
        }
    }

    let workload = match Workload::new(blocks, processes, &Limits::unbounded()) {
        Ok(w) => w,
        Err(_) => return,
    };
    let comparison = compare(&workload);
    assert!(comparison.best().utilization_percent <= 100.0);
});
