// Steering state space demo
//
// Plots the paths produced by the different state spaces for one query
// so their geometry can be compared side by side.

use gnuplot::{AxesCommon, Caption, Color, Figure};

use rust_steering::{
    CcDubinsStateSpace, CcReedsSheppStateSpace, Direction, DubinsStateSpace, Hc00StateSpace,
    HcpmpmStateSpace, ReedsSheppStateSpace, State, StateSpace,
};

fn main() {
    let kappa = 1.0;
    let sigma = 1.0;
    let discretization = 0.05;

    let start = State::origin();
    let goal = State::new(4.0, 3.0, (120.0_f64).to_radians(), 0.0, Direction::Forward);

    let spaces: Vec<(&str, &str, Box<dyn StateSpace>)> = vec![
        (
            "Dubins",
            "red",
            Box::new(DubinsStateSpace::new(kappa, discretization, true).unwrap())
                as Box<dyn StateSpace>,
        ),
        (
            "Reeds-Shepp",
            "blue",
            Box::new(ReedsSheppStateSpace::new(kappa, discretization).unwrap()),
        ),
        (
            "CC-Dubins",
            "orange",
            Box::new(CcDubinsStateSpace::new(kappa, sigma, discretization, true).unwrap()),
        ),
        (
            "CC-Reeds-Shepp",
            "green",
            Box::new(CcReedsSheppStateSpace::new(kappa, sigma, discretization).unwrap()),
        ),
        (
            "HC00",
            "violet",
            Box::new(Hc00StateSpace::new(kappa, sigma, discretization).unwrap()),
        ),
        (
            "HCpmpm",
            "brown",
            Box::new(HcpmpmStateSpace::new(kappa, sigma, discretization).unwrap()),
        ),
    ];

    let mut fg = Figure::new();
    let axes = fg.axes2d();
    axes.set_title("Steering state spaces", &[])
        .set_x_label("x [m]", &[])
        .set_y_label("y [m]", &[])
        .set_aspect_ratio(gnuplot::AutoOption::Fix(1.0));

    for (name, color, space) in &spaces {
        match space.path(&start, &goal) {
            Ok(states) => {
                let xs: Vec<f64> = states.iter().map(|s| s.x).collect();
                let ys: Vec<f64> = states.iter().map(|s| s.y).collect();
                let length = space.distance(&start, &goal).unwrap();
                println!("{}: length {:.3} m, {} samples", name, length, states.len());
                axes.lines(&xs, &ys, &[Caption(*name), Color(*color)]);
            }
            Err(e) => println!("{}: {}", name, e),
        }
    }

    // Start and goal heading markers.
    let arrow = 0.5;
    axes.lines(
        &[start.x, start.x + arrow * start.theta.cos()],
        &[start.y, start.y + arrow * start.theta.sin()],
        &[Caption("start"), Color("black")],
    );
    axes.lines(
        &[goal.x, goal.x + arrow * goal.theta.cos()],
        &[goal.y, goal.y + arrow * goal.theta.sin()],
        &[Caption("goal"), Color("gray")],
    );

    let output = "img/steering_demo.png";
    std::fs::create_dir_all("img").ok();
    match fg.save_to_png(output, 800, 600) {
        Ok(()) => println!("plot saved to {}", output),
        Err(e) => println!("could not save plot: {:?}", e),
    }
}
