use std::io::{self, Write};

use yuzu_calc::{evaluate, round_places};

fn main() {
    println!("Enter a single line math equation. Addition, subtraction,");
    println!("multiplication and division are supported, operands can be");
    println!("integers, PI or E. An empty line or \"exit\" quits.");

    loop {
        print!("> ");
        io::stdout().flush().expect("Failed to flush stdout");

        let mut input = String::new();

        io::stdin()
            .read_line(&mut input)
            .expect("Failed to read line");

        let input = input.trim();

        if input.is_empty() || input == "exit" {
            break;
        }

        match evaluate::<64>(input) {
            Ok(value) => println!("{}", round_places(value, 4)),
            Err(err) => println!("Error: {}", err),
        }
    }
}
