use fracpaq::{project, segment, AxisFlip, RoseScalar, StressParameters, STRESS_ROSE_BINS};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // A fan of fractures every 15 degrees.
    let segments: Vec<_> = (0..12)
        .map(|i| {
            let angle = f64::from(i * 15).to_radians();
            segment(0.0, 0.0, angle.cos(), angle.sin())
        })
        .collect();

    let params = StressParameters {
        sigma1: 80.0,
        sigma2: 20.0,
        theta_deg: 30.0,
        pore_pressure: 25.0,
        flip: AxisFlip::new(false, true),
        ..StressParameters::default()
    };
    let projection = project(&segments, &params)?;

    for fracture in projection.fractures() {
        println!(
            "azimuth {:>5.1}: sn = {:>6.2}, tau = {:>6.2}, Ts = {:.3}, Td = {:.3}, Sf = {:>6.2}{}",
            fracture.azimuth_deg,
            fracture.normal_stress,
            fracture.shear_stress,
            fracture.slip_tendency,
            fracture.dilation_tendency,
            fracture.susceptibility,
            if fracture.critically_stressed { " CSF" } else { "" }
        );
    }

    let rose = projection.rose(RoseScalar::SlipTendency, STRESS_ROSE_BINS);
    println!("outer reference ring: {}%", rose.rose.reference.outer_percent);

    Ok(())
}
