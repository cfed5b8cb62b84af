mod web_socket_connection;
