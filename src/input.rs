use std::fmt::Display;
use std::io::Read;

use itertools::Itertools;
use simple_error::{try_with, SimpleError};

use crate::network::{Edge, FormatError, Network};
use crate::params::{self, InputParams};

const TERMINATOR: &str = "E";

/// A parsed network together with the number of steps to simulate.
#[derive(Debug, Clone, PartialEq)]
pub struct Instance {
    pub network: Network,
    pub num_steps: usize,
}

pub fn read_instance<R: Read>(
    mut reader: R,
    input_params: &InputParams,
) -> Result<Instance, FormatError> {
    let mut text = String::new();
    try_with!(reader.read_to_string(&mut text), "failed to read input");
    parse_instance(&text, input_params)
}

/// Parses `M` (or `M N`), the initial states, the thresholds, `N` unless given in the header,
/// then `a b [w]` edge lines up to an optional `E`. Text after `#` is ignored.
pub fn parse_instance(text: &str, input_params: &InputParams) -> Result<Instance, FormatError> {
    try_with!(
        params::validate_input_params(input_params),
        "invalid input parameters"
    );

    let mut lines = text.lines().enumerate().filter_map(|(idx, line)| {
        let content = match line.find('#') {
            Some(pos) => &line[..pos],
            None => line,
        }
        .trim();

        if content.is_empty() {
            None
        } else {
            Some((idx + 1, content))
        }
    });

    let (line_no, header) = lines
        .next()
        .ok_or_else(|| SimpleError::new("empty input"))?;

    let (num_neurons, header_steps) = match header.split_whitespace().collect::<Vec<_>>()[..] {
        [num_neurons] => (parse_count(line_no, num_neurons, "neuron count")?, None),
        [num_neurons, num_steps] => (
            parse_count(line_no, num_neurons, "neuron count")?,
            Some(parse_count(line_no, num_steps, "step count")?),
        ),
        ref tokens => {
            return Err(line_error(
                line_no,
                format!(
                    "malformed header, expected \"M\" or \"M N\" but found {} tokens",
                    tokens.len()
                ),
            ))
        }
    };

    let (initial_states, thresholds) = if num_neurons > 0 {
        let (line_no, line) = next_line(&mut lines, "initial states")?;
        let initial_states = parse_states(line_no, line, num_neurons)?;

        let (line_no, line) = next_line(&mut lines, "thresholds")?;
        let thresholds = parse_thresholds(line_no, line, num_neurons)?;

        (initial_states, thresholds)
    } else {
        (Vec::new(), Vec::new())
    };

    let num_steps = match header_steps {
        Some(num_steps) => num_steps,
        None => {
            let (line_no, line) = next_line(&mut lines, "step count")?;
            parse_count(line_no, line, "step count")?
        }
    };

    let mut edges = Vec::new();
    for (line_no, line) in lines {
        if line == TERMINATOR {
            break;
        }
        edges.push(parse_edge(line_no, line, num_neurons, input_params.index_base)?);
    }

    let network = try_with!(
        Network::build_with(
            num_neurons,
            initial_states,
            thresholds,
            edges,
            input_params.numeric_domain
        ),
        "malformed network"
    );

    Ok(Instance { network, num_steps })
}

/// Renders `network` and `num_steps` in the text format, with `index_base` neuron ids.
pub fn write_instance(network: &Network, num_steps: usize, index_base: usize) -> String {
    let mut text = format!("{}\n", network.num_neurons());

    if network.num_neurons() > 0 {
        let states = network
            .initial_states()
            .iter()
            .map(|active| if *active { "1" } else { "0" })
            .join(" ");
        let thresholds = network.thresholds().iter().join(" ");
        text.push_str(&format!("{}\n{}\n", states, thresholds));
    }
    text.push_str(&format!("{}\n", num_steps));

    for edge in network.edges() {
        text.push_str(&format!(
            "{} {} {}\n",
            edge.source + index_base,
            edge.target + index_base,
            edge.weight
        ));
    }
    text.push_str(TERMINATOR);
    text.push('\n');

    text
}

fn next_line<'a>(
    lines: &mut impl Iterator<Item = (usize, &'a str)>,
    what: &str,
) -> Result<(usize, &'a str), FormatError> {
    lines
        .next()
        .ok_or_else(|| SimpleError::new(format!("unexpected end of input, missing {}", what)))
}

fn line_error(line_no: usize, msg: impl Display) -> FormatError {
    SimpleError::new(format!("line {}: {}", line_no, msg))
}

fn parse_count(line_no: usize, token: &str, what: &str) -> Result<usize, FormatError> {
    token.parse().map_err(|_| {
        line_error(
            line_no,
            format!("{} must be a non-negative integer, got \"{}\"", what, token),
        )
    })
}

fn parse_states(line_no: usize, line: &str, num_neurons: usize) -> Result<Vec<bool>, FormatError> {
    let states = line
        .split_whitespace()
        .enumerate()
        .map(|(nid, token)| match token {
            "0" => Ok(false),
            "1" => Ok(true),
            _ => Err(line_error(
                line_no,
                format!(
                    "initial state of neuron {} must be 0 or 1, got \"{}\"",
                    nid, token
                ),
            )),
        })
        .collect::<Result<Vec<_>, _>>()?;

    if states.len() != num_neurons {
        return Err(line_error(
            line_no,
            format!("expected {} initial states, got {}", num_neurons, states.len()),
        ));
    }

    Ok(states)
}

fn parse_thresholds(
    line_no: usize,
    line: &str,
    num_neurons: usize,
) -> Result<Vec<f64>, FormatError> {
    let thresholds = line
        .split_whitespace()
        .enumerate()
        .map(|(nid, token)| {
            token.parse::<f64>().map_err(|_| {
                line_error(
                    line_no,
                    format!("threshold of neuron {} is not a number: \"{}\"", nid, token),
                )
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    if thresholds.len() != num_neurons {
        return Err(line_error(
            line_no,
            format!("expected {} thresholds, got {}", num_neurons, thresholds.len()),
        ));
    }

    Ok(thresholds)
}

fn parse_edge(
    line_no: usize,
    line: &str,
    num_neurons: usize,
    index_base: usize,
) -> Result<Edge, FormatError> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.len() != 2 && tokens.len() != 3 {
        return Err(line_error(
            line_no,
            format!("expected \"source target [weight]\", got \"{}\"", line),
        ));
    }

    let parse_nid = |token: &str| -> Result<usize, FormatError> {
        token
            .parse::<usize>()
            .ok()
            .and_then(|id| id.checked_sub(index_base))
            .filter(|nid| *nid < num_neurons)
            .ok_or_else(|| {
                line_error(
                    line_no,
                    format!(
                        "neuron id \"{}\" is not in {}..{}",
                        token,
                        index_base,
                        num_neurons + index_base
                    ),
                )
            })
    };

    let source = parse_nid(tokens[0])?;
    let target = parse_nid(tokens[1])?;
    let weight = match tokens.get(2) {
        Some(token) => token
            .parse::<f64>()
            .map_err(|_| line_error(line_no, format!("invalid weight \"{}\"", token)))?,
        None => 1.0,
    };

    Ok(Edge::new(source, target, weight))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::NumericDomain;
    use float_cmp::assert_approx_eq;
    use itertools::assert_equal;

    const SMALL: &str = "3
1 0 0
0.5 1 2

4
1 2 0.5
2 3
3 1 -1.5
E
";

    fn parse(text: &str) -> Result<Instance, FormatError> {
        parse_instance(text, &InputParams::default())
    }

    fn parse_err(text: &str) -> String {
        parse(text).unwrap_err().as_str().to_string()
    }

    #[test]
    fn parses_small_instance() {
        let instance = parse(SMALL).unwrap();
        let network = &instance.network;

        assert_eq!(instance.num_steps, 4);
        assert_eq!(network.num_neurons(), 3);
        assert_eq!(network.initial_states(), [true, false, false]);
        assert_approx_eq!(f64, network.threshold(0), 0.5);
        assert_equal(network.outgoing(0), [(1, 0.5)]);
        assert_equal(network.outgoing(1), [(2, 1.0)]);
        assert_equal(network.outgoing(2), [(0, -1.5)]);
    }

    #[test]
    fn header_with_step_count() {
        let instance = parse("2 7\n1 1\n0 0\n1 2 3\n").unwrap();

        assert_eq!(instance.num_steps, 7);
        assert_equal(instance.network.outgoing(0), [(1, 3.0)]);
    }

    #[test]
    fn zero_based_ids() {
        let input_params = InputParams {
            index_base: 0,
            numeric_domain: NumericDomain::Real,
        };
        let instance = parse_instance("2\n1 0\n1 1\n3\n0 1\n", &input_params).unwrap();

        assert_equal(instance.network.outgoing(0), [(1, 1.0)]);
    }

    #[test]
    fn comments_and_terminator() {
        let text = "# demo\n1 # neurons\n1\n0\n2\n1 1 # loop\nE\n1 1 trailing garbage\n";
        let instance = parse(text).unwrap();

        assert_eq!(instance.network.num_edges(), 1);
        assert_eq!(instance.num_steps, 2);
    }

    #[test]
    fn empty_network() {
        let instance = parse("0\n5\n").unwrap();

        assert_eq!(instance.network.num_neurons(), 0);
        assert_eq!(instance.num_steps, 5);
    }

    #[test]
    fn malformed_header() {
        assert_eq!(parse_err(""), "empty input");
        assert_eq!(
            parse_err("3 4 5\n"),
            "line 1: malformed header, expected \"M\" or \"M N\" but found 3 tokens"
        );
        assert_eq!(
            parse_err("-3\n"),
            "line 1: neuron count must be a non-negative integer, got \"-3\""
        );
        assert_eq!(
            parse_err("2 x\n"),
            "line 1: step count must be a non-negative integer, got \"x\""
        );
    }

    #[test]
    fn malformed_states() {
        assert_eq!(parse_err("2\n1 0 1\n0 0\n1\n"), "line 2: expected 2 initial states, got 3");
        assert_eq!(
            parse_err("2\n1 2\n0 0\n1\n"),
            "line 2: initial state of neuron 1 must be 0 or 1, got \"2\""
        );
        assert_eq!(parse_err("2\n"), "unexpected end of input, missing initial states");
    }

    #[test]
    fn malformed_thresholds() {
        assert_eq!(parse_err("2\n1 0\n0.5\n1\n"), "line 3: expected 2 thresholds, got 1");
        assert_eq!(
            parse_err("2\n1 0\n0.5 abc\n1\n"),
            "line 3: threshold of neuron 1 is not a number: \"abc\""
        );
        assert_eq!(
            parse_err("2\n1 0\n0.5 inf\n1\n"),
            "malformed network, threshold of neuron 1: must be finite"
        );
    }

    #[test]
    fn missing_step_count() {
        assert_eq!(parse_err("1\n1\n0\n"), "unexpected end of input, missing step count");
        assert_eq!(
            parse_err("1\n1\n0\n2.5\n"),
            "line 4: step count must be a non-negative integer, got \"2.5\""
        );
    }

    #[test]
    fn malformed_edges() {
        assert_eq!(
            parse_err("2\n1 0\n0 0\n1\n1\n"),
            "line 5: expected \"source target [weight]\", got \"1\""
        );
        assert_eq!(
            parse_err("2\n1 0\n0 0\n1\n1 3 0.5\n"),
            "line 5: neuron id \"3\" is not in 1..3"
        );
        assert_eq!(
            parse_err("2\n1 0\n0 0\n1\n0 1 0.5\n"),
            "line 5: neuron id \"0\" is not in 1..3"
        );
        assert_eq!(
            parse_err("2\n1 0\n0 0\n1\n1 2 heavy\n"),
            "line 5: invalid weight \"heavy\""
        );
    }

    #[test]
    fn integer_domain() {
        let input_params = InputParams {
            index_base: 1,
            numeric_domain: NumericDomain::Integer,
        };

        assert!(parse_instance("2\n1 0\n1 -2\n3\n1 2 4\n", &input_params).is_ok());

        let result = parse_instance("2\n1 0\n1 1\n3\n1 2 0.5\n", &input_params);
        assert_eq!(
            result.unwrap_err().as_str(),
            "malformed network, weight of edge 0: must be an integer"
        );
    }

    #[test]
    fn written_instance_text() {
        let instance = parse("2\n1 0\n0.5 1\n3\n1 2 2\n2 2 -0.25\n").unwrap();

        assert_eq!(
            write_instance(&instance.network, instance.num_steps, 1),
            "2\n1 0\n0.5 1\n3\n1 2 2\n2 2 -0.25\nE\n"
        );
        assert_eq!(
            write_instance(&instance.network, instance.num_steps, 0),
            "2\n1 0\n0.5 1\n3\n0 1 2\n1 1 -0.25\nE\n"
        );
    }

    #[test]
    fn written_instance_parses_back() {
        let instance = parse(SMALL).unwrap();
        let text = write_instance(&instance.network, instance.num_steps, 1);
        let reparsed = parse(&text).unwrap();

        assert_eq!(reparsed.num_steps, instance.num_steps);
        assert_eq!(reparsed.network.edges(), instance.network.edges());
        assert_eq!(reparsed.network.thresholds(), instance.network.thresholds());
    }

    #[test]
    fn read_from_reader() {
        let instance = read_instance(SMALL.as_bytes(), &InputParams::default()).unwrap();
        assert_eq!(instance.network.num_edges(), 3);
    }
}
