use std::time::Duration;

use console::Style;
use dlhm_core::config::SessionConfig;
use dlhm_core::filters::FilterStep;
use dlhm_core::params::{Algorithm, ReconstructionParameters};

struct Styles {
    title: Style,
    header: Style,
    label: Style,
    value: Style,
    method: Style,
    disabled: Style,
    path: Style,
}

impl Styles {
    fn new() -> Self {
        Self {
            title: Style::new().cyan().bold(),
            header: Style::new().cyan().bold(),
            label: Style::new().dim(),
            value: Style::new().bold().white(),
            method: Style::new().green(),
            disabled: Style::new().dim().yellow(),
            path: Style::new().underlined(),
        }
    }
}

pub fn print_session_summary(config: &SessionConfig, duration: Duration) {
    let s = Styles::new();

    println!();
    println!("  {}", s.title.apply_to("DLHM Live Session"));
    println!("  {}", s.title.apply_to("\u{2550}".repeat(17)));
    println!();

    println!(
        "  {:<14}{}",
        s.label.apply_to("Source"),
        s.method.apply_to(&config.source.kind)
    );
    if config.source.mirror {
        println!(
            "  {:<14}{}",
            s.label.apply_to("Mirror"),
            s.value.apply_to("on")
        );
    }
    match config.source.reference {
        Some(ref path) => println!(
            "  {:<14}{}",
            s.label.apply_to("Reference"),
            s.path.apply_to(path.display())
        ),
        None => println!(
            "  {:<14}{}",
            s.label.apply_to("Reference"),
            s.disabled.apply_to("none")
        ),
    }
    println!(
        "  {:<14}{}",
        s.label.apply_to("Duration"),
        s.value.apply_to(format!("{:.1} s", duration.as_secs_f64()))
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Export"),
        s.path.apply_to(config.export.dir.display())
    );
    println!();

    print_parameters_section(&s, &config.parameters);
    print_filters_section(&s, "Capture Filters", &config.capture_filters);
    print_filters_section(&s, "Reconstruction Filters", &config.reconstruction_filters);
}

pub fn print_reconstruction_summary(params: &ReconstructionParameters, filters: &[FilterStep]) {
    let s = Styles::new();

    println!();
    println!("  {}", s.title.apply_to("Reconstruction"));
    println!("  {}", s.title.apply_to("\u{2550}".repeat(14)));
    println!();

    print_parameters_section(&s, params);
    print_filters_section(&s, "Filters", filters);
}

fn print_parameters_section(s: &Styles, params: &ReconstructionParameters) {
    println!("  {}", s.header.apply_to("Parameters"));
    println!(
        "    {:<14}{}",
        s.label.apply_to("Algorithm"),
        s.method.apply_to(params.algorithm)
    );
    println!(
        "    {:<14}{}",
        s.label.apply_to("Output"),
        s.method.apply_to(params.output_mode)
    );
    println!(
        "    {:<14}{}",
        s.label.apply_to("L / Z / r"),
        s.value.apply_to(format!(
            "{} / {} / {} \u{00b5}m",
            params.l,
            params.z,
            params.r()
        ))
    );
    println!(
        "    {:<14}{}",
        s.label.apply_to("Wavelength"),
        s.value.apply_to(format!("{} \u{00b5}m", params.wavelength))
    );
    println!(
        "    {:<14}{}",
        s.label.apply_to("Pixel pitch"),
        s.value.apply_to(format!("{} \u{00b5}m", params.pixel_pitch))
    );
    match params.algorithm {
        Algorithm::AngularSpectrum => println!(
            "    {:<14}{}",
            s.label.apply_to("Magnification"),
            s.value.apply_to(format!("{:.2}x", params.magnification()))
        ),
        Algorithm::Kreuzer => println!(
            "    {:<14}{}",
            s.label.apply_to("Cosine period"),
            s.value.apply_to(params.cosine_period)
        ),
    }
    println!();
}

fn print_filters_section(s: &Styles, title: &str, steps: &[FilterStep]) {
    if steps.is_empty() {
        println!(
            "  {:<14}{}",
            s.header.apply_to(title),
            s.disabled.apply_to("none")
        );
    } else {
        println!("  {}", s.header.apply_to(title));
        for (i, step) in steps.iter().enumerate() {
            println!(
                "    {}. {}",
                s.label.apply_to(i + 1),
                s.value.apply_to(step)
            );
        }
    }
    println!();
}
