use aoc2023_day_10::*;

fn main() {
    // Run registered benchmarks.
    divan::main();
}

#[divan::bench]
fn part1() {
    part1::process(divan::black_box(include_str!("../input1.txt"))).unwrap();
}

#[divan::bench]
fn part2() {
    part2::process(divan::black_box(include_str!("../input2.txt"))).unwrap();
}

#[divan::bench]
fn analyze_both() {
    analyze(divan::black_box(include_str!("../input2.txt"))).unwrap();
}
