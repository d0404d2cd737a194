pub mod nested_sqs;
