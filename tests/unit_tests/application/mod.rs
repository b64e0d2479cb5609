mod ingestion_service_test;
mod ingestion_worker_test;
mod management_service_test;
mod response_formatter_test;
