use fracpaq::{count_rose, orientations_deg, parse_traces, rose_hist, AxisFlip, TraceMap};

const MAP: &str = "\
# x y pairs per trace
0 0 4 1 8 3
2 5 2 9
1 1 6 -3 9 -4
-2 0 3 0
";

fn main() {
    let map = TraceMap::new(parse_traces(MAP));
    let segments = map.segments();
    println!("{} traces, {} segments", map.trace_count(), map.segment_count());
    for (i, midpoint) in map.trace_midpoints().iter().enumerate() {
        println!("trace {i} midpoint: ({:.2}, {:.2})", midpoint.x, midpoint.y);
    }

    let simple = rose_hist(&orientations_deg(&segments), 12, true);
    for (theta, count) in simple.theta.iter().zip(simple.counts.iter()) {
        println!("{:>6.1} deg: {count}", theta.to_degrees());
    }

    let rose = count_rose(&segments, AxisFlip::NONE, 12);
    for bin in rose.bins.iter().filter(|bin| bin.count > 0) {
        println!(
            "north {:>5.1}-{:>5.1}: fraction {:.3}, radius {:.3}",
            bin.start.to_degrees(),
            bin.end.to_degrees(),
            bin.fraction,
            bin.radius
        );
    }
}
