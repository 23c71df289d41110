/*
    Thin CLI collaborator: joins two CSV tables on their shared first column,
    seeds with k-means++, refines with Lloyd iteration, and prints the
    selected seed indices followed by the centroids at 4 decimal places.

    Usage: kmeantune k [max_iter] epsilon input1 input2
*/

use std::env;
use std::process::exit;

use kmeantune::{io, Error, KMeans, DEFAULT_MAX_ITER};

fn invalid_input() -> ! {
    println!("Invalid Input!");
    exit(1)
}

fn exception_handler() -> ! {
    println!("An Error Has Occurred");
    exit(1)
}

fn parse_count(arg: &str) -> usize {
    match arg.parse::<usize>() {
        Ok(value) => value,
        Err(_) => invalid_input(),
    }
}

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().skip(1).collect();
    let (k, max_iter, epsilon, input1, input2) = match args.len() {
        5 => (
            parse_count(&args[0]),
            parse_count(&args[1]),
            args[2].as_str(),
            args[3].as_str(),
            args[4].as_str(),
        ),
        4 => (
            parse_count(&args[0]),
            DEFAULT_MAX_ITER,
            args[1].as_str(),
            args[2].as_str(),
            args[3].as_str(),
        ),
        _ => invalid_input(),
    };

    let epsilon: f64 = match epsilon.parse() {
        Ok(value) => value,
        Err(_) => invalid_input(),
    };

    if k <= 1 || max_iter == 0 || epsilon < 0.0 {
        invalid_input();
    }

    let points = match io::load_joined(input1, input2) {
        Ok(points) => points,
        Err(_) => exception_handler(),
    };

    let output = KMeans::new(k)
        .set_max_iter(max_iter)
        .set_epsilon(epsilon)
        .fit(&points);
    let output = match output {
        Ok(output) => output,
        Err(Error::InvalidArgument(_)) => invalid_input(),
        Err(_) => exception_handler(),
    };

    println!("{}", io::format_seed_indices(&output.seed_indices));
    for centroid in &output.centroids {
        println!("{}", io::format_centroid(centroid));
    }
}
