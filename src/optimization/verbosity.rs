use std::io::{self, Write};
use terminal_size::{terminal_size, Width};

use super::genetic_algorithm::GeneticAlgorithmParameters;
use super::individual::Individual;

#[derive(Clone, Debug, PartialEq)]
pub enum YapLevel {
    ALot,
    ALittle,
    None,
}

#[derive(Clone, Debug)]
pub struct Yapper {
    pub max_generations: Option<usize>,
    pub problem_size: usize,
    pub parameters: GeneticAlgorithmParameters,
    pub yap_level: YapLevel,
    last_msg_len: usize, // Tracks the length of the last message for clearing
}

impl Yapper {
    pub fn new
    (
        max_generations: Option<usize>,
        problem_size: usize,
        parameters: &GeneticAlgorithmParameters,
        yap_level: YapLevel,
    ) -> Self {

        Self {
            max_generations,
            problem_size,
            parameters: parameters.clone(),
            yap_level,
            last_msg_len: 0,
        }
    }

    pub fn startup_yap(&self) {
        match self.yap_level {
            YapLevel::None => return,
            YapLevel::ALittle => {
                println!("\n\nStarting a run of GeneticAlgorithm");
                println!("=============================================");
            }
            YapLevel::ALot => {
                println!("\n\nStarting a run of GeneticAlgorithm");
                println!("=============================================");
                println!("With parameters:\n");
                println!(
                         "Maximum Generations   : {}",
                    self.max_generations
                        .map(|gens| gens.to_string())
                        .unwrap_or_else(|| "None".to_string())
                );
                println!("Problem Size          : {}", self.problem_size);
                println!("Population Size       : {}", self.parameters.population_size);
                println!("Offspring Size        : {}", self.parameters.offspring_size);
                println!("Mutation Scale        : {:.3}", self.parameters.mutation_scale);
                println!("Crossover Probability : {:.3}", self.parameters.crossover_probability);
                println!("=============================================\n");
            }
        }
    }

    pub fn generation_message(&self, current_generation: usize, best: &Individual) -> String {
        let generation_display = self.max_generations.map_or_else(
            || format!("Current Generation: {}", current_generation),
            |max| format!("Current Generation: {}/{}", current_generation, max),
        );

        match self.yap_level {
            YapLevel::None => String::new(),
            YapLevel::ALittle => generation_display,
            YapLevel::ALot => {
                let fitness_info = match best.f().get(0) {
                    Some(f) => format!(" | Best Objective: {:.6}", f),
                    None => String::new(),
                };

                let formatted_individual: Vec<String> = best.x()
                    .iter()
                    .map(|x| format!("{:.6}", x))
                    .collect();

                format!("{}{} | Best Individual: [{}]", generation_display, fitness_info, formatted_individual.join(", "))
            }
        }
    }

    pub fn generation_yap(&mut self, current_generation: usize, best: &Individual) {
        if let YapLevel::None = self.yap_level {
            return;
        }

        // Only print every 10 generations
        if current_generation % 10 != 0 {
            return;
        }

        let output = self.generation_message(current_generation, best);

        let terminal_width = match terminal_size() {
            Some((Width(w), _)) => w as usize,
            None => 80,
        };

        let prev_lines = lines_spanned(self.last_msg_len, terminal_width);

        // Clear the previous message
        if self.last_msg_len > 0 {
            for _ in 0..prev_lines {
                print!("\x1B[1A"); // Move up one line
                print!("\x1B[2K"); // Clear the line
            }
            print!("\r");
        }

        println!("{}", output);
        let _ = io::stdout().flush();

        self.last_msg_len = output.len();
    }
}

// Terminal lines a message of `msg_len` characters wraps onto. Some terminals report a width of 0
fn lines_spanned(msg_len: usize, terminal_width: usize) -> usize {
    let terminal_width = terminal_width.max(1);
    (msg_len + terminal_width - 1) / terminal_width
}
