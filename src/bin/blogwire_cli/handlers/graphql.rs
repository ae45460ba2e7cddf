#![deny(clippy::all, clippy::pedantic)]

use blogwire::BlogClient;
use blogwire::http::GraphqlRequest;

use crate::args::GraphqlArgs;
use crate::client::CliError;
use crate::io::{parse_variables, read_value};
use crate::print::print_json;

pub async fn run(client: &BlogClient, args: GraphqlArgs) -> Result<(), CliError> {
    let query = read_value(args.query, args.query_file)?;
    let mut request = GraphqlRequest::new(query);
    request.variables = parse_variables(args.variables)?;
    print_json(&client.raw_graphql(&request).await?)
}
